use crate::naming::CandidateName;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::debug;

/// Suffixes tried by [`CollisionStrategy::Increment`].
pub const INCREMENT_SUFFIXES: RangeInclusive<u32> = 2..=9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionStrategy {
    Increment,
    Skip,
    LastModifiedSuffix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Rename here. May still be taken when every increment was used up; the
    /// rename step refuses to overwrite it.
    Target(PathBuf),
    /// Leave the file alone because `taken` is occupied.
    Skip { taken: PathBuf },
}

pub fn resolve_destination(
    dir: &Path,
    candidate: &CandidateName,
    strategy: CollisionStrategy,
) -> Resolution {
    let target = dir.join(candidate.file_name());
    if !is_taken(&target) {
        return Resolution::Target(target);
    }
    debug!("... {} already exists", target.display());

    match strategy {
        CollisionStrategy::Increment => {
            let mut last = target;
            for n in INCREMENT_SUFFIXES {
                last = dir.join(candidate.with_suffix(n.to_string()).file_name());
                if !is_taken(&last) {
                    break;
                }
            }
            Resolution::Target(last)
        }
        CollisionStrategy::Skip => Resolution::Skip { taken: target },
        CollisionStrategy::LastModifiedSuffix => {
            let Some(suffix) = modified_millis_suffix(&target) else {
                return Resolution::Skip { taken: target };
            };
            let alternate = dir.join(candidate.with_suffix(suffix).file_name());
            if is_taken(&alternate) {
                Resolution::Skip { taken: alternate }
            } else {
                Resolution::Target(alternate)
            }
        }
    }
}

/// Also true for dangling symlinks, which `Path::exists` reports as absent.
pub fn is_taken(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Last three digits of the file's mtime in epoch milliseconds.
fn modified_millis_suffix(path: &Path) -> Option<String> {
    let modified = fs::metadata(path).ok()?.modified().ok()?;
    let millis = modified.duration_since(UNIX_EPOCH).ok()?.as_millis();
    Some(format!("{:03}", millis % 1000))
}
