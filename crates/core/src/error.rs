use std::path::PathBuf;
use thiserror::Error;

/// Per-file failures. None of these abort a batch; the renamer records them
/// and moves on to the next entry.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("no readable metadata in {path}")]
    MetadataDecodeFailure { path: PathBuf },

    #[error("no date found in file {path}")]
    NoDateFound { path: PathBuf },

    #[error("destination already exists: {path}")]
    DestinationExists { path: PathBuf },

    #[error("cannot rename {from} -> {to}")]
    Rename {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read {path}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RenameError {
    /// Short machine-friendly label used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            RenameError::MetadataDecodeFailure { .. } => "metadata-decode-failure",
            RenameError::NoDateFound { .. } => "no-date-found",
            RenameError::DestinationExists { .. } => "destination-exists",
            RenameError::Rename { .. } => "rename-failed",
            RenameError::Filesystem { .. } => "filesystem",
        }
    }

    /// Message including the underlying I/O cause, if any.
    pub fn detailed_message(&self) -> String {
        match self {
            RenameError::Rename { source, .. } | RenameError::Filesystem { source, .. } => {
                format!("{self}: {source}")
            }
            _ => self.to_string(),
        }
    }
}
