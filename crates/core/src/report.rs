use crate::error::RenameError;
use crate::metadata::DateSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    Renamed { to: PathBuf, source: DateSource },
    WouldRename { to: PathBuf, source: DateSource },
    AlreadyNamed { source: DateSource },
    Skipped { taken: PathBuf },
    Failed { kind: String, message: String },
    Missing,
}

impl Outcome {
    pub fn failed(err: &RenameError) -> Self {
        Outcome::Failed {
            kind: err.kind().to_string(),
            message: err.detailed_message(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct RunStats {
    pub renamed: usize,
    pub would_rename: usize,
    pub already_named: usize,
    pub skipped: usize,
    pub failed: usize,
    pub missing: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunReport {
    pub dry_run: bool,
    pub entries: Vec<FileReport>,
    pub stats: RunStats,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    pub fn record(&mut self, path: &Path, outcome: Outcome) {
        let counter = match &outcome {
            Outcome::Renamed { .. } => &mut self.stats.renamed,
            Outcome::WouldRename { .. } => &mut self.stats.would_rename,
            Outcome::AlreadyNamed { .. } => &mut self.stats.already_named,
            Outcome::Skipped { .. } => &mut self.stats.skipped,
            Outcome::Failed { .. } => &mut self.stats.failed,
            Outcome::Missing => &mut self.stats.missing,
        };
        *counter += 1;
        self.entries.push(FileReport {
            path: path.to_path_buf(),
            outcome,
        });
    }

    pub fn outcome_for(&self, path: &Path) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|entry| entry.path == path)
            .map(|entry| &entry.outcome)
    }
}
