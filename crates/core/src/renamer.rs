use crate::collision::{is_taken, resolve_destination, Resolution};
use crate::config::RunConfig;
use crate::error::RenameError;
use crate::exif_reader::{ExifReader, MetadataReader};
use crate::naming::{is_already_named, CandidateName};
use crate::report::{Outcome, RunReport};
use crate::resolver::DateResolver;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub struct Renamer<R = ExifReader> {
    config: RunConfig,
    resolver: DateResolver<R>,
}

impl Renamer<ExifReader> {
    pub fn new(config: RunConfig) -> Self {
        Self::with_reader(ExifReader, config)
    }
}

impl<R: MetadataReader> Renamer<R> {
    pub fn with_reader(reader: R, config: RunConfig) -> Self {
        let resolver = DateResolver::new(reader, &config);
        Self { config, resolver }
    }

    /// Processes every path in order. Per-file and per-directory failures
    /// are recorded in the report, never returned.
    pub fn run<P: AsRef<Path>>(&self, paths: &[P]) -> RunReport {
        let mut report = RunReport::new(self.config.dry_run);
        debug!(
            "Processing path list {:?}",
            paths.iter().map(|p| p.as_ref()).collect::<Vec<_>>()
        );

        for path in paths {
            let path = path.as_ref();
            debug!("Current path {}", path.display());
            if path.is_dir() {
                debug!("... is a directory");
                self.process_directory(path, &mut report);
            } else if path.is_file() {
                debug!("... is a file");
                report.record(path, self.process_file(path));
            } else {
                info!("{} does not exist, skipping", path.display());
                report.record(path, Outcome::Missing);
            }
        }

        report
    }

    fn process_directory(&self, dir: &Path, report: &mut RunReport) {
        debug!("Processing directory {}", dir.display());
        let files = match list_files(dir) {
            Ok(files) => files,
            Err(err) => {
                warn!("Cannot read directory: {}", err.detailed_message());
                report.record(dir, Outcome::failed(&err));
                return;
            }
        };

        for file in files {
            report.record(&file, self.process_file(&file));
        }
    }

    pub fn process_file(&self, path: &Path) -> Outcome {
        match self.try_process_file(path) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    "Cannot rename file {}: {}",
                    path.display(),
                    err.detailed_message()
                );
                Outcome::failed(&err)
            }
        }
    }

    fn try_process_file(&self, path: &Path) -> Result<Outcome, RenameError> {
        debug!("Processing file {}", path.display());
        let resolved = self.resolver.resolve(path)?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let candidate = CandidateName::for_file(&resolved.date, &file_name);
        if is_already_named(&file_name, &candidate.base) {
            info!("File {} already renamed, skipping ...", path.display());
            return Ok(Outcome::AlreadyNamed {
                source: resolved.source,
            });
        }

        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        let target = match resolve_destination(dir, &candidate, self.config.collision_strategy())
        {
            Resolution::Target(target) => target,
            Resolution::Skip { taken } => {
                info!("File {} already exists, skipping ...", taken.display());
                return Ok(Outcome::Skipped { taken });
            }
        };
        if is_taken(&target) {
            return Err(RenameError::DestinationExists { path: target });
        }

        info!(
            "Renaming from {} to {} ({})",
            path.display(),
            target.display(),
            resolved.source
        );
        if self.config.dry_run {
            info!("*** DRY RUN / NOTHING CHANGED ***");
            return Ok(Outcome::WouldRename {
                to: target,
                source: resolved.source,
            });
        }

        rename_file(path, &target)?;
        Ok(Outcome::Renamed {
            to: target,
            source: resolved.source,
        })
    }
}

fn rename_file(from: &Path, to: &Path) -> Result<(), RenameError> {
    fs::rename(from, to).map_err(|source| RenameError::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

/// Immediate file entries of `dir`, collected up front so renames during
/// processing cannot feed back into the listing.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>, RenameError> {
    let mut out = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|err| RenameError::Filesystem {
            path: err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf()),
            source: err.into(),
        })?;
        let path = entry.path();
        debug!("Current path {}", path.display());
        if path.is_file() {
            out.push(path.to_path_buf());
        } else {
            debug!("... is not a file, ignoring");
        }
    }
    Ok(out)
}
