//! Builds minimal EXIF-bearing JPEG files for tests.

use std::fs;
use std::path::Path;

pub const EXIF_SAMPLE_DATE: &str = "2004:06:21 14:30:05";

const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

const TAG_DATETIME: u16 = 0x0132;
const TAG_EXIF_POINTER: u16 = 0x8769;
const TAG_GPS_POINTER: u16 = 0x8825;
const TAG_DATETIME_ORIGINAL: u16 = 0x9003;
const TAG_DATETIME_DIGITIZED: u16 = 0x9004;
const TAG_SUBSEC_ORIGINAL: u16 = 0x9291;
const TAG_GPS_TIME: u16 = 0x0007;
const TAG_GPS_DATE: u16 = 0x001d;

#[derive(Debug, Clone)]
struct Entry {
    tag: u16,
    kind: u16,
    count: u32,
    data: Vec<u8>,
}

impl Entry {
    fn ascii(tag: u16, value: &str) -> Self {
        let mut data = value.as_bytes().to_vec();
        data.push(0);
        Self {
            tag,
            kind: TYPE_ASCII,
            count: data.len() as u32,
            data,
        }
    }

    fn long(tag: u16, value: u32) -> Self {
        Self {
            tag,
            kind: TYPE_LONG,
            count: 1,
            data: value.to_le_bytes().to_vec(),
        }
    }

    fn rationals(tag: u16, values: &[(u32, u32)]) -> Self {
        let mut data = Vec::with_capacity(values.len() * 8);
        for (num, denom) in values {
            data.extend_from_slice(&num.to_le_bytes());
            data.extend_from_slice(&denom.to_le_bytes());
        }
        Self {
            tag,
            kind: TYPE_RATIONAL,
            count: values.len() as u32,
            data,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExifFixture {
    primary: Vec<Entry>,
    exif: Vec<Entry>,
    gps: Vec<Entry>,
}

impl ExifFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_datetime(mut self, value: &str) -> Self {
        self.primary.push(Entry::ascii(TAG_DATETIME, value));
        self
    }

    pub fn original(mut self, value: &str) -> Self {
        self.exif.push(Entry::ascii(TAG_DATETIME_ORIGINAL, value));
        self
    }

    pub fn original_subsec(mut self, value: &str) -> Self {
        self.exif.push(Entry::ascii(TAG_SUBSEC_ORIGINAL, value));
        self
    }

    pub fn digitized(mut self, value: &str) -> Self {
        self.exif.push(Entry::ascii(TAG_DATETIME_DIGITIZED, value));
        self
    }

    pub fn gps(mut self, date: &str, time: Option<(u32, u32, u32)>) -> Self {
        self.gps.push(Entry::ascii(TAG_GPS_DATE, date));
        if let Some((h, m, s)) = time {
            self.gps
                .push(Entry::rationals(TAG_GPS_TIME, &[(h, 1), (m, 1), (s, 1)]));
        }
        self
    }

    /// Little-endian TIFF stream: IFD0, then the Exif and GPS IFDs.
    fn tiff(&self) -> Vec<u8> {
        let mut primary = self.primary.clone();
        if !self.exif.is_empty() {
            primary.push(Entry::long(TAG_EXIF_POINTER, 0));
        }
        if !self.gps.is_empty() {
            primary.push(Entry::long(TAG_GPS_POINTER, 0));
        }

        let exif_offset = 8 + ifd_len(&primary);
        let gps_offset = exif_offset + ifd_len(&self.exif);
        for entry in &mut primary {
            match entry.tag {
                TAG_EXIF_POINTER => entry.data = (exif_offset as u32).to_le_bytes().to_vec(),
                TAG_GPS_POINTER => entry.data = (gps_offset as u32).to_le_bytes().to_vec(),
                _ => {}
            }
        }

        let mut out = b"II".to_vec();
        out.extend_from_slice(&42u16.to_le_bytes());
        out.extend_from_slice(&8u32.to_le_bytes());
        write_ifd(&mut out, primary);
        if !self.exif.is_empty() {
            write_ifd(&mut out, self.exif.clone());
        }
        if !self.gps.is_empty() {
            write_ifd(&mut out, self.gps.clone());
        }
        out
    }

    pub fn jpeg_bytes(&self) -> Vec<u8> {
        let tiff = self.tiff();
        let segment_len = (2 + 6 + tiff.len()) as u16;
        let mut out = vec![0xff, 0xd8, 0xff, 0xe1];
        out.extend_from_slice(&segment_len.to_be_bytes());
        out.extend_from_slice(b"Exif\0\0");
        out.extend_from_slice(&tiff);
        out.extend_from_slice(&[0xff, 0xd9]);
        out
    }

    pub fn write_jpeg(&self, path: &Path) {
        fs::write(path, self.jpeg_bytes()).expect("fixture must be writable");
    }
}

fn ifd_len(entries: &[Entry]) -> usize {
    if entries.is_empty() {
        return 0;
    }
    let data: usize = entries
        .iter()
        .filter(|e| e.data.len() > 4)
        .map(|e| (e.data.len() + 1) & !1)
        .sum();
    2 + 12 * entries.len() + 4 + data
}

fn write_ifd(out: &mut Vec<u8>, mut entries: Vec<Entry>) {
    entries.sort_by_key(|e| e.tag);
    let data_start = out.len() + 2 + 12 * entries.len() + 4;
    let mut data = Vec::new();

    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    for entry in &entries {
        out.extend_from_slice(&entry.tag.to_le_bytes());
        out.extend_from_slice(&entry.kind.to_le_bytes());
        out.extend_from_slice(&entry.count.to_le_bytes());
        if entry.data.len() <= 4 {
            let mut inline = entry.data.clone();
            inline.resize(4, 0);
            out.extend_from_slice(&inline);
        } else {
            out.extend_from_slice(&((data_start + data.len()) as u32).to_le_bytes());
            data.extend_from_slice(&entry.data);
            if data.len() % 2 == 1 {
                data.push(0);
            }
        }
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&data);
}
