use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const BASE_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `yyyyMMdd_HHmmss` of the local wall-clock reading.
pub fn canonical_base(date: &NaiveDateTime) -> String {
    date.format(BASE_FORMAT).to_string()
}

/// Everything from the last `.` of the name, lower-cased. Names without a
/// dot get an empty extension; a leading-dot name is all extension.
pub fn extension_of(file_name: &str) -> String {
    file_name
        .rfind('.')
        .map(|idx| file_name[idx..].to_lowercase())
        .unwrap_or_default()
}

pub fn is_already_named(file_name: &str, base: &str) -> bool {
    file_name.starts_with(base)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateName {
    pub base: String,
    pub extension: String,
    pub suffix: Option<String>,
}

impl CandidateName {
    pub fn new(base: String, extension: String) -> Self {
        Self {
            base,
            extension,
            suffix: None,
        }
    }

    pub fn for_file(date: &NaiveDateTime, original_name: &str) -> Self {
        Self::new(canonical_base(date), extension_of(original_name))
    }

    /// Same base and extension, with `_<suffix>` inserted before the extension.
    pub fn with_suffix(&self, suffix: impl Into<String>) -> Self {
        Self {
            suffix: Some(suffix.into()),
            ..self.clone()
        }
    }

    pub fn file_name(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}_{}{}", self.base, suffix, self.extension),
            None => format!("{}{}", self.base, self.extension),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap()
    }

    fn sample() -> NaiveDateTime {
        at(2004, 6, 1, 4, 3, 5)
    }

    #[test]
    fn base_is_zero_padded_24h() {
        assert_eq!(canonical_base(&sample()), "20040601_040305");
        assert_eq!(canonical_base(&at(2004, 12, 31, 23, 59, 59)), "20041231_235959");
    }

    #[test]
    fn base_keeps_wall_clock_digits_in_dst_gap() {
        assert_eq!(canonical_base(&at(2004, 4, 4, 2, 30, 0)), "20040404_023000");
    }

    #[test]
    fn extension_is_lowercased_from_last_dot() {
        assert_eq!(extension_of("IMG_0001.JPG"), ".jpg");
        assert_eq!(extension_of("archive.tar.GZ"), ".gz");
        assert_eq!(extension_of("clip.Mov"), ".mov");
    }

    #[test]
    fn extension_edge_cases() {
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of(".hidden"), ".hidden");
        assert_eq!(extension_of("trailing."), ".");
    }

    #[test]
    fn candidate_file_names() {
        let candidate = CandidateName::for_file(&sample(), "IMG_0001.JPG");
        assert_eq!(candidate.file_name(), "20040601_040305.jpg");
        assert_eq!(candidate.with_suffix("2").file_name(), "20040601_040305_2.jpg");

        let bare = CandidateName::for_file(&sample(), "README");
        assert_eq!(bare.file_name(), "20040601_040305");
        assert_eq!(bare.with_suffix("3").file_name(), "20040601_040305_3");
    }

    #[test]
    fn already_named_checks_prefix() {
        assert!(is_already_named("20040601_040305.jpg", "20040601_040305"));
        assert!(is_already_named("20040601_040305_2.JPG", "20040601_040305"));
        assert!(!is_already_named("IMG_0001.JPG", "20040601_040305"));
    }
}
