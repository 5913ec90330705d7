use crate::metadata::{TagCategory, TagDate};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use exif::{Exif, In, Rational, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, trace};

/// Source of embedded dates. `None` means nothing could be decoded from the
/// file at all; otherwise one slot per [`TagCategory`], each possibly empty.
pub trait MetadataReader {
    fn read_tag_dates(&self, path: &Path) -> Option<Vec<TagDate>>;
}

/// EXIF-backed reader (JPEG, TIFF, HEIF, PNG, WebP containers).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn read_tag_dates(&self, path: &Path) -> Option<Vec<TagDate>> {
        let exif = match read_exif(path) {
            Ok(exif) => exif,
            Err(err) => {
                debug!("... no EXIF information found: {err:#}");
                return None;
            }
        };

        Some(
            TagCategory::PRIORITY
                .iter()
                .map(|&category| TagDate {
                    category,
                    date: tag_date(&exif, category),
                })
                .collect(),
        )
    }
}

fn read_exif(path: &Path) -> Result<Exif> {
    let file = File::open(path)
        .with_context(|| format!("cannot open for EXIF reading: {}", path.display()))?;
    let mut buf = BufReader::new(file);
    Reader::new()
        .read_from_container(&mut buf)
        .with_context(|| format!("cannot parse EXIF: {}", path.display()))
}

fn tag_date(exif: &Exif, category: TagCategory) -> Option<NaiveDateTime> {
    let date = match category {
        TagCategory::ImageDateTime => ascii_datetime(exif, Tag::DateTime, Tag::SubSecTime),
        TagCategory::DateTimeOriginal => {
            ascii_datetime(exif, Tag::DateTimeOriginal, Tag::SubSecTimeOriginal)
        }
        TagCategory::DateTimeDigitized => {
            ascii_datetime(exif, Tag::DateTimeDigitized, Tag::SubSecTimeDigitized)
        }
        TagCategory::GpsDateStamp => gps_datetime(exif),
    };
    if date.is_none() {
        trace!("... cannot get the date in metadata {category:?}");
    }
    date
}

fn ascii_value(exif: &Exif, tag: Tag) -> Option<&str> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    let Value::Ascii(values) = &field.value else {
        return None;
    };
    values
        .first()
        .and_then(|raw| std::str::from_utf8(raw).ok())
        .map(|s| s.trim_matches(|c: char| c == '\0' || c.is_whitespace()))
        .filter(|s| !s.is_empty())
}

/// EXIF wall-clock values carry no zone and are kept as-is, so the rendered
/// name reproduces the camera's clock digits even inside a DST gap.
fn ascii_datetime(exif: &Exif, tag: Tag, subsec_tag: Tag) -> Option<NaiveDateTime> {
    let naive = parse_exif_datetime(ascii_value(exif, tag)?)?;
    Some(match ascii_value(exif, subsec_tag).and_then(parse_subsec) {
        Some(nanos) => naive.with_nanosecond(nanos).unwrap_or(naive),
        None => naive,
    })
}

fn gps_datetime(exif: &Exif) -> Option<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(ascii_value(exif, Tag::GPSDateStamp)?, "%Y:%m:%d").ok()?;
    Some(match gps_time(exif) {
        // GPS time is UTC.
        Some(time) => Utc
            .from_utc_datetime(&date.and_time(time))
            .with_timezone(&Local)
            .naive_local(),
        None => date.and_time(NaiveTime::MIN),
    })
}

fn gps_time(exif: &Exif) -> Option<NaiveTime> {
    let field = exif.get_field(Tag::GPSTimeStamp, In::PRIMARY)?;
    let Value::Rational(parts) = &field.value else {
        return None;
    };
    let [hour, minute, second, ..] = parts.as_slice() else {
        return None;
    };
    if second.denom == 0 {
        return None;
    }
    let millis = u64::from(second.num) * 1000 / u64::from(second.denom);
    NaiveTime::from_hms_milli_opt(
        whole(hour)?,
        whole(minute)?,
        u32::try_from(millis / 1000).ok()?,
        (millis % 1000) as u32,
    )
}

fn whole(value: &Rational) -> Option<u32> {
    (value.denom != 0).then(|| value.num / value.denom)
}

fn parse_exif_datetime(input: &str) -> Option<NaiveDateTime> {
    ["%Y:%m:%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
}

/// `SubSecTime*` holds the leading fraction digits ("5" means .5 s).
fn parse_subsec(input: &str) -> Option<u32> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = input.chars().chain(std::iter::repeat('0')).take(9).collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_exif_datetime, parse_subsec, ExifReader, MetadataReader};
    use crate::metadata::{first_tag_date, TagCategory};
    use crate::test_support::{ExifFixture, EXIF_SAMPLE_DATE};
    use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
    use std::fs;
    use tempfile::tempdir;

    fn wall_clock(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .unwrap()
    }

    #[test]
    fn reads_original_capture_date() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("IMG_0001.JPG");
        ExifFixture::new()
            .original(EXIF_SAMPLE_DATE)
            .write_jpeg(&path);

        let tags = ExifReader.read_tag_dates(&path).expect("exif decodes");
        assert_eq!(tags.len(), 4);
        let found = first_tag_date(&tags).expect("date present");
        assert_eq!(found.category, TagCategory::DateTimeOriginal);
        assert_eq!(
            found.date,
            Some(wall_clock(2004, 6, 21, 14, 30, 5))
        );
    }

    #[test]
    fn wall_clock_inside_dst_gap_is_kept() {
        // 02:30 on 2004-04-04 does not exist in US Eastern time; the digits
        // must survive whatever zone the process runs in.
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("gap.jpg");
        ExifFixture::new()
            .original("2004:04:04 02:30:00")
            .write_jpeg(&path);

        let tags = ExifReader.read_tag_dates(&path).expect("exif decodes");
        let found = first_tag_date(&tags).expect("date present");
        assert_eq!(found.date, Some(wall_clock(2004, 4, 4, 2, 30, 0)));
    }

    #[test]
    fn image_datetime_outranks_original() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("both.jpg");
        ExifFixture::new()
            .image_datetime("2010:01:02 03:04:05")
            .original(EXIF_SAMPLE_DATE)
            .write_jpeg(&path);

        let tags = ExifReader.read_tag_dates(&path).expect("exif decodes");
        let found = first_tag_date(&tags).expect("date present");
        assert_eq!(found.category, TagCategory::ImageDateTime);
    }

    #[test]
    fn blank_tag_falls_through_to_digitized() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("blank.jpg");
        ExifFixture::new()
            .original("    :  :     :  :  ")
            .digitized("2001:02:03 04:05:06")
            .write_jpeg(&path);

        let tags = ExifReader.read_tag_dates(&path).expect("exif decodes");
        let found = first_tag_date(&tags).expect("date present");
        assert_eq!(found.category, TagCategory::DateTimeDigitized);
    }

    #[test]
    fn subseconds_are_applied() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("subsec.jpg");
        ExifFixture::new()
            .original(EXIF_SAMPLE_DATE)
            .original_subsec("25")
            .write_jpeg(&path);

        let tags = ExifReader.read_tag_dates(&path).expect("exif decodes");
        let date = first_tag_date(&tags).and_then(|t| t.date).expect("date");
        assert_eq!(date.nanosecond(), 250_000_000);
    }

    #[test]
    fn gps_stamp_combines_date_and_utc_time() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("gps.jpg");
        ExifFixture::new()
            .gps("2004:06:21", Some((12, 30, 5)))
            .write_jpeg(&path);

        let tags = ExifReader.read_tag_dates(&path).expect("exif decodes");
        let found = first_tag_date(&tags).expect("date present");
        assert_eq!(found.category, TagCategory::GpsDateStamp);
        let expected = Utc
            .with_ymd_and_hms(2004, 6, 21, 12, 30, 5)
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(found.date, Some(expected));
    }

    #[test]
    fn gps_date_without_time_is_local_midnight() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("gps-date.jpg");
        ExifFixture::new().gps("2004:06:21", None).write_jpeg(&path);

        let tags = ExifReader.read_tag_dates(&path).expect("exif decodes");
        let found = first_tag_date(&tags).expect("date present");
        assert_eq!(
            found.date,
            Some(wall_clock(2004, 6, 21, 0, 0, 0))
        );
    }

    #[test]
    fn non_image_yields_none() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("notes.txt");
        fs::write(&path, b"just some notes").expect("write");
        assert!(ExifReader.read_tag_dates(&path).is_none());
    }

    #[test]
    fn parse_helpers() {
        assert!(parse_exif_datetime("2004:06:21 14:30:05").is_some());
        assert!(parse_exif_datetime("2004-06-21 14:30:05").is_some());
        assert!(parse_exif_datetime("0000:00:00 00:00:00").is_none());
        assert_eq!(parse_subsec("5"), Some(500_000_000));
        assert_eq!(parse_subsec("123"), Some(123_000_000));
        assert_eq!(parse_subsec("1a"), None);
    }
}
