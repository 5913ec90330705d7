use chrono::{DateTime, Local, NaiveDateTime};
use regex::bytes::Regex;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// Bytes read from each end of the file.
pub const SCAN_WINDOW: u64 = 2048;

enum PatternKind {
    /// Naive wall-clock, taken as local time digit for digit.
    Naive(&'static str),
    /// Carries its own numeric offset.
    Offset(&'static str),
}

struct DatePattern {
    regex: &'static LazyLock<Regex>,
    kind: PatternKind,
}

static RE_CTIME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)\w{3} \d{2} \d{2}:\d{2}:\d{2} \d{4}").unwrap());
static RE_EXIF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)\d{4}:\d{2}:\d{2} \d{2}:\d{2}:\d{2}").unwrap());
static RE_ISO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u)\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}[+-]\d{4}").unwrap());

static PATTERNS: &[DatePattern] = &[
    DatePattern {
        regex: &RE_CTIME,
        kind: PatternKind::Naive("%b %d %H:%M:%S %Y"),
    },
    DatePattern {
        regex: &RE_EXIF,
        kind: PatternKind::Naive("%Y:%m:%d %H:%M:%S"),
    },
    DatePattern {
        regex: &RE_ISO,
        kind: PatternKind::Offset("%Y-%m-%dT%H:%M:%S%z"),
    },
];

/// Looks for a date string in the head, then the tail, of the file.
pub fn scan_file(path: &Path) -> io::Result<Option<NaiveDateTime>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();

    let head = read_window(&mut file, 0)?;
    if let Some(date) = find_date(&head) {
        return Ok(Some(date));
    }

    if len <= SCAN_WINDOW {
        return Ok(None);
    }
    let tail = read_window(&mut file, len - SCAN_WINDOW)?;
    Ok(find_date(&tail))
}

fn read_window(file: &mut File, offset: u64) -> io::Result<Vec<u8>> {
    file.seek(SeekFrom::Start(offset))?;
    let mut buf = Vec::with_capacity(SCAN_WINDOW as usize);
    file.take(SCAN_WINDOW).read_to_end(&mut buf)?;
    Ok(buf)
}

/// First pattern in table order with a match that parses wins. Matches that
/// look right but are not real dates ("Foo 99 ...") are passed over.
pub fn find_date(data: &[u8]) -> Option<NaiveDateTime> {
    PATTERNS.iter().find_map(|pattern| {
        pattern.regex.find_iter(data).find_map(|m| {
            let text = std::str::from_utf8(m.as_bytes()).ok()?;
            let parsed = parse_match(text, &pattern.kind);
            match parsed {
                Some(_) => debug!("... found {text}"),
                None => trace!("... ignoring unparsable {text}"),
            }
            parsed
        })
    })
}

fn parse_match(text: &str, kind: &PatternKind) -> Option<NaiveDateTime> {
    match kind {
        PatternKind::Naive(fmt) => NaiveDateTime::parse_from_str(text, fmt).ok(),
        PatternKind::Offset(fmt) => DateTime::parse_from_str(text, fmt)
            .ok()
            .map(|dt| dt.with_timezone(&Local).naive_local()),
    }
}
