use crate::config::RunConfig;
use crate::error::RenameError;
use crate::exif_reader::{ExifReader, MetadataReader};
use crate::metadata::{first_tag_date, DateSource, ResolvedDate};
use crate::text_scan::scan_file;
use chrono::{DateTime, Local, NaiveDateTime};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Runs the date strategies in order: embedded tags, text scan, then mtime
/// when allowed.
#[derive(Debug, Clone)]
pub struct DateResolver<R = ExifReader> {
    reader: R,
    use_last_modified: bool,
    strict_metadata: bool,
}

impl DateResolver<ExifReader> {
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(ExifReader, config)
    }
}

impl<R: MetadataReader> DateResolver<R> {
    pub fn new(reader: R, config: &RunConfig) -> Self {
        Self {
            reader,
            use_last_modified: config.use_last_modified,
            strict_metadata: config.strict_metadata,
        }
    }

    pub fn resolve(&self, path: &Path) -> Result<ResolvedDate, RenameError> {
        debug!("Looking for an EXIF date in file: {}", path.display());
        match self.reader.read_tag_dates(path) {
            Some(tags) => {
                if let Some((tag, date)) =
                    first_tag_date(&tags).and_then(|tag| tag.date.map(|date| (tag, date)))
                {
                    let resolved = ResolvedDate::new(date, DateSource::EmbeddedMetadata);
                    debug!(
                        "... found {} in {:?}",
                        resolved.display_millis(),
                        tag.category
                    );
                    return Ok(resolved);
                }
            }
            None if self.strict_metadata => {
                return Err(RenameError::MetadataDecodeFailure {
                    path: path.to_path_buf(),
                });
            }
            None => {}
        }

        let scanned = scan_file(path).map_err(|source| RenameError::Filesystem {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(date) = scanned {
            return Ok(ResolvedDate::new(date, DateSource::TextPattern));
        }

        if self.use_last_modified {
            let date = modified_local(path).map_err(|source| RenameError::Filesystem {
                path: path.to_path_buf(),
                source,
            })?;
            let resolved = ResolvedDate::new(date, DateSource::FilesystemMtime);
            debug!("... used file's lastModified {}", resolved.display_millis());
            return Ok(resolved);
        }

        debug!("... no date found");
        Err(RenameError::NoDateFound {
            path: path.to_path_buf(),
        })
    }
}

fn modified_local(path: &Path) -> std::io::Result<NaiveDateTime> {
    let time = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Local>::from(time).naive_local())
}
