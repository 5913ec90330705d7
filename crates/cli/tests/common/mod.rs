use exif_rename_core::test_support::{ExifFixture, EXIF_SAMPLE_DATE};
use std::fs;
use std::path::{Path, PathBuf};

pub fn write_photo(dir: &Path, name: &str) -> PathBuf {
    write_photo_dated(dir, name, EXIF_SAMPLE_DATE)
}

/// Photo whose only date is `DateTimeOriginal = date`.
pub fn write_photo_dated(dir: &Path, name: &str, date: &str) -> PathBuf {
    let path = dir.join(name);
    ExifFixture::new().original(date).write_jpeg(&path);
    path
}

/// Empty config file so tests never pick up the user's own settings.
pub fn empty_config(dir: &Path) -> PathBuf {
    let path = dir.join("exif-rename.toml");
    fs::write(&path, "").expect("write config");
    path
}

pub fn sorted_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("read dir")
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
