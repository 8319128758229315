//! Codec for the device's log filename convention.
//!
//! STATCLAVE units store cycle logs on their internal filesystem as
//!
//! ```text
//! /opt/data/scilog/{YYYY}/{MM}/{DD}/S{YYYYMMDD}_{cycle:05}_{serial}.{txt|cpt}
//! ```
//!
//! The `.txt` file is the human-readable cycle log; the `.cpt` file holds
//! the sampled telemetry. The archive page advertises the same names
//! without an extension, so [`FileInfo::parse`] accepts both forms.
//!
//! Cycle numbers are zero-padded to 5 digits in every path this module
//! builds; parsing accepts any digit count and compares numerically.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use time::{Date, Month};

use crate::error::ParseError;
use crate::types::CycleInfo;

/// Root of the device's on-board log filesystem.
pub const DEVICE_LOG_ROOT: &str = "/opt/data/scilog";

/// Anchored filename grammar. Extension is optional because the archive
/// page lists bare stems.
static FILE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^S(\d{4})(\d{2})(\d{2})_(\d+)_([A-Z0-9]+)(?:\.(txt|cpt))?$")
        .expect("filename grammar regex is valid")
});

/// Unanchored variant used to scan arbitrary response bodies for
/// filenames.
static FILE_NAME_SCAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)S\d{8}_\d+_[A-Z0-9]+(?:\.(?:txt|cpt))?")
        .expect("filename scan regex is valid")
});

/// Structured fields of an on-device log filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Four-digit year from the filename.
    pub year: i32,
    /// Month, 1-12.
    pub month: u8,
    /// Day of month, 1-31.
    pub day: u8,
    /// Cycle number, parsed as an integer (leading zeros dropped).
    pub cycle_number: u32,
    /// Device serial number segment, verbatim.
    pub serial_number: String,
    /// The filename date as a calendar date.
    pub date: Date,
}

impl FileInfo {
    /// Parse a filename or full path into its structured fields.
    ///
    /// Only the trailing path segment is considered, so both
    /// `S20251008_0001755_710123B00004.txt` and
    /// `/opt/data/scilog/2025/10/08/S20251008_0001755_710123B00004.txt`
    /// parse identically. Returns `None` for any string that does not
    /// match the grammar; never panics.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        path.parse().ok()
    }
}

impl FromStr for FileInfo {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.rsplit(['/', '\\']).next().unwrap_or(s).trim();
        let captures = FILE_NAME_RE
            .captures(name)
            .ok_or_else(|| ParseError::FilenameMismatch(name.to_string()))?;

        // The grammar guarantees each capture is a bounded digit run, so
        // the integer parses cannot fail; year is the only group wide
        // enough to need i32.
        let year: i32 = captures[1]
            .parse()
            .map_err(|_| ParseError::FilenameMismatch(name.to_string()))?;
        let month: u8 = captures[2]
            .parse()
            .map_err(|_| ParseError::FilenameMismatch(name.to_string()))?;
        let day: u8 = captures[3]
            .parse()
            .map_err(|_| ParseError::FilenameMismatch(name.to_string()))?;
        let cycle_number: u32 = captures[4]
            .parse()
            .map_err(|_| ParseError::FilenameMismatch(name.to_string()))?;

        let date = Month::try_from(month)
            .ok()
            .and_then(|m| Date::from_calendar_date(year, m, day).ok())
            .ok_or(ParseError::InvalidDate { year, month, day })?;

        Ok(FileInfo {
            year,
            month,
            day,
            cycle_number,
            serial_number: captures[5].to_string(),
            date,
        })
    }
}

/// Build the canonical log filename for a cycle.
///
/// The cycle number is zero-padded to 5 digits, matching the on-device
/// convention.
#[must_use]
pub fn cycle_file_name(date: Date, cycle_number: u32, serial_number: &str, ext: &str) -> String {
    format!(
        "S{:04}{:02}{:02}_{:05}_{}.{}",
        date.year(),
        u8::from(date.month()),
        date.day(),
        cycle_number,
        serial_number,
        ext,
    )
}

/// Build the full on-device path for a cycle's log file.
#[must_use]
pub fn cycle_file_path(date: Date, cycle_number: u32, serial_number: &str, ext: &str) -> String {
    format!(
        "{}/{}",
        day_directory(date.year(), u8::from(date.month()), date.day()),
        cycle_file_name(date, cycle_number, serial_number, ext),
    )
}

/// Build the on-device directory holding one day's log files.
#[must_use]
pub fn day_directory(year: i32, month: u8, day: u8) -> String {
    format!("{DEVICE_LOG_ROOT}/{year:04}/{month:02}/{day:02}")
}

/// Scan arbitrary text for substrings matching the filename grammar.
///
/// Used against directory-listing bodies and archive HTML, where
/// filenames appear embedded in markup. Matches are returned in order of
/// appearance, duplicates included.
#[must_use]
pub fn scan_file_names(text: &str) -> Vec<String> {
    FILE_NAME_SCAN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

impl CycleInfo {
    /// Reconstruct the on-device path for this cycle's log file.
    ///
    /// The directory is derived from the cycle's own epoch timestamp (the
    /// device's timestamp is authoritative, even when a caller guessed a
    /// different day). Any extension already present on the stored stem is
    /// replaced with `ext`. Returns `None` when the epoch value is out of
    /// range.
    #[must_use]
    pub fn log_path(&self, ext: &str) -> Option<String> {
        let t = self.start_time()?;
        let stem = self
            .file_name
            .strip_suffix(".txt")
            .or_else(|| self.file_name.strip_suffix(".cpt"))
            .unwrap_or(&self.file_name);
        Some(format!(
            "{}/{}.{}",
            day_directory(t.year(), u8::from(t.month()), t.day()),
            stem,
            ext,
        ))
    }
}
