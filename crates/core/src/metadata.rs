use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a resolved date came from. Only used for diagnostics and reports.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DateSource {
    EmbeddedMetadata,
    TextPattern,
    FilesystemMtime,
}

impl fmt::Display for DateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateSource::EmbeddedMetadata => "embedded-metadata",
            DateSource::TextPattern => "text-pattern",
            DateSource::FilesystemMtime => "filesystem-mtime",
        };
        f.write_str(label)
    }
}

/// `date` is a wall-clock reading in the process-local zone. Camera values
/// are kept digit for digit, so no zone rule can make them unrepresentable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDateTime,
    pub source: DateSource,
}

impl ResolvedDate {
    pub fn new(date: NaiveDateTime, source: DateSource) -> Self {
        Self { date, source }
    }

    /// `yyyy-MM-dd HH:mm:ss.SSS`, for log lines.
    pub fn display_millis(&self) -> String {
        self.date.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }
}

/// The embedded date tags consulted, in priority order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TagCategory {
    /// IFD0 `DateTime`, the file-level modification stamp.
    ImageDateTime,
    DateTimeOriginal,
    DateTimeDigitized,
    GpsDateStamp,
}

impl TagCategory {
    pub const PRIORITY: [TagCategory; 4] = [
        TagCategory::ImageDateTime,
        TagCategory::DateTimeOriginal,
        TagCategory::DateTimeDigitized,
        TagCategory::GpsDateStamp,
    ];
}

/// One slot returned by a [`crate::MetadataReader`]; `date` is `None` when the
/// tag is missing or could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagDate {
    pub category: TagCategory,
    pub date: Option<NaiveDateTime>,
}

/// First present date following [`TagCategory::PRIORITY`], regardless of the
/// order the reader returned the slots in.
pub fn first_tag_date(tags: &[TagDate]) -> Option<TagDate> {
    TagCategory::PRIORITY.iter().find_map(|category| {
        tags.iter()
            .find(|tag| tag.category == *category && tag.date.is_some())
            .copied()
    })
}
