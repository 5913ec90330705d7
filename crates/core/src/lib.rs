mod collision;
mod config;
mod error;
mod exif_reader;
mod metadata;
mod naming;
mod renamer;
mod report;
mod resolver;
mod text_scan;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use collision::{resolve_destination, CollisionStrategy, Resolution, INCREMENT_SUFFIXES};
pub use config::{app_paths, load_config, AppPaths, CollisionFallback, RunConfig};
pub use error::RenameError;
pub use exif_reader::{ExifReader, MetadataReader};
pub use metadata::{DateSource, ResolvedDate, TagCategory, TagDate};
pub use naming::{canonical_base, extension_of, CandidateName};
pub use renamer::Renamer;
pub use report::{FileReport, Outcome, RunReport, RunStats};
pub use resolver::DateResolver;
pub use text_scan::{find_date, scan_file, SCAN_WINDOW};
