//! Parser for the device's free-text cycle log.
//!
//! STATCLAVE units embed a printable, CRLF-delimited cycle report in the
//! telemetry payload. It is not a stable machine-readable format: field
//! order varies between firmware revisions, and several fields only exist
//! on some cycle programs. Parsing is therefore a single forward pass
//! over trimmed, non-empty lines with independent per-line pattern
//! checks. Three fields genuinely depend on line order — the min/max
//! sterilizing values follow their label lines, and the digital signature
//! follows a sentinel line — so the scan is index-based over a line
//! array, making lookahead a plain array access.
//!
//! Every field is optional except the model (always the first line) and
//! the cycle number; a log missing either is treated as unparseable and
//! yields no result rather than a partially-valid record.

use std::sync::LazyLock;

use regex::Regex;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use time::{Date, Month, PrimitiveDateTime, Time};

static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Unit #\s*:\s*(\d+)").expect("unit regex is valid"));

static CYCLE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^CYCLE NUMBER\s*(\d+)").expect("cycle number regex is valid"));

/// Wall-clock stamp: time first, then DD/MM/YYYY. The device writes the
/// day before the month; this must not be reinterpreted as MM/DD.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2}):(\d{2})\s+(\d{2})/(\d{2})/(\d{4})")
        .expect("timestamp regex is valid")
});

static TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*C/(\d+)min").expect("target regex is valid"));

static STERI_VALUES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+\.?\d*)\s*C\s+(\d+)kPa").expect("sterilizing values regex is valid")
});

/// MM:SS-like pair on phase lines; only the minute component is kept.
static PHASE_MINUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2}):(\d{2})").expect("phase minute regex is valid"));

/// Structured decomposition of a device cycle log.
///
/// Derived statelessly from the raw log text; recomputed on every parse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsedCycleLog {
    /// Model string, taken verbatim from the first line.
    pub model: String,
    /// Serial number from the `SN ` line.
    pub serial_number: Option<String>,
    /// Unit number from the `Unit # :` line.
    pub unit_number: Option<u32>,
    /// Water quality line (conductivity and ppm), kept verbatim.
    pub water_quality: Option<String>,
    /// Cycle number from the `CYCLE NUMBER` line.
    pub cycle_number: u32,
    /// Wall-clock cycle timestamp (device-local, day-before-month order).
    pub cycle_date_time: Option<PrimitiveDateTime>,
    /// Free-text program name, e.g. "Solid/Wrapped".
    pub program: Option<String>,
    /// Target sterilization temperature in Celsius.
    pub target_temp: Option<u32>,
    /// Target sterilization time in minutes.
    pub target_time: Option<u32>,
    /// Minimum sterilizing temperature in Celsius.
    pub min_temp: Option<f64>,
    /// Minimum sterilizing pressure in kPa.
    pub min_pressure: Option<u32>,
    /// Maximum sterilizing temperature in Celsius.
    pub max_temp: Option<f64>,
    /// Maximum sterilizing pressure in kPa.
    pub max_pressure: Option<u32>,
    /// Sterilizing phase start, minutes into the cycle.
    pub sterilizing_start: Option<u32>,
    /// Sterilizing phase end, minutes into the cycle.
    ///
    /// Observed device output carries a single MM:SS pair on the
    /// STERILIZING line, so start and end are set to the same minute.
    /// Kept as observed rather than "fixed".
    pub sterilizing_end: Option<u32>,
    /// Drying phase start, minutes into the cycle.
    pub drying_start: Option<u32>,
    /// Drying phase end, minutes into the cycle.
    pub drying_end: Option<u32>,
    /// Cycle completion mark, minutes into the cycle.
    pub cycle_complete: Option<u32>,
    /// Digital signature following the `Digital Signature #` sentinel.
    pub digital_signature: Option<String>,
}

impl ParsedCycleLog {
    /// Parse a raw cycle log into its structured fields.
    ///
    /// Individual field extractions that do not match are simply omitted.
    /// Returns `None` only when the model or cycle number could not be
    /// extracted — a record missing either is "no result", never
    /// partially valid.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let mut model: Option<String> = None;
        let mut serial_number = None;
        let mut unit_number = None;
        let mut water_quality = None;
        let mut cycle_number: Option<u32> = None;
        let mut cycle_date_time = None;
        let mut program = None;
        let mut target_temp = None;
        let mut target_time = None;
        let mut min_temp = None;
        let mut min_pressure = None;
        let mut max_temp = None;
        let mut max_pressure = None;
        let mut sterilizing_start = None;
        let mut sterilizing_end = None;
        let mut drying_start = None;
        let mut drying_end = None;
        let mut cycle_complete = None;
        let mut digital_signature = None;

        for (i, line) in lines.iter().enumerate() {
            if i == 0 {
                model = Some((*line).to_string());
            } else if let Some(rest) = line.strip_prefix("SN ") {
                serial_number = Some(rest.trim().to_string());
            } else if let Some(captures) = UNIT_RE.captures(line) {
                unit_number = captures[1].parse().ok();
            } else if line.contains("uS") && line.contains("ppm") {
                water_quality = Some((*line).to_string());
            } else if line.starts_with("CYCLE NUMBER") {
                if let Some(captures) = CYCLE_NUMBER_RE.captures(line) {
                    cycle_number = captures[1].parse().ok();
                }
            } else if let Some(captures) = TIMESTAMP_RE.captures(line) {
                // First stamp wins; later lines may carry phase stamps.
                if cycle_date_time.is_none() {
                    cycle_date_time = parse_timestamp(&captures);
                }
            } else if line.contains('/') && !line.contains(':') && !line.contains("ppm") {
                if let Some(captures) = TARGET_RE.captures(line) {
                    target_temp = captures[1].parse().ok();
                    target_time = captures[2].parse().ok();
                } else if !line.contains("Values") {
                    program = Some((*line).to_string());
                }
            } else if *line == "Min. steri. Values:" {
                if let Some((temp, pressure)) = steri_values(lines.get(i + 1)) {
                    min_temp = Some(temp);
                    min_pressure = Some(pressure);
                }
            } else if *line == "Max. steri. Values:" {
                if let Some((temp, pressure)) = steri_values(lines.get(i + 1)) {
                    max_temp = Some(temp);
                    max_pressure = Some(pressure);
                }
            } else if line.starts_with("STERILIZING") {
                if let Some(minute) = phase_minute(line) {
                    sterilizing_start = Some(minute);
                    sterilizing_end = Some(minute);
                }
            } else if line.starts_with("DRYING START") {
                drying_start = phase_minute(line);
            } else if line.starts_with("DRYING END") {
                drying_end = phase_minute(line);
            } else if line.starts_with("CYCLE COMPLETE") {
                cycle_complete = phase_minute(line);
            } else if *line == "Digital Signature #" {
                // A following line starting with '-' is a separator, not
                // a signature.
                if let Some(next) = lines.get(i + 1) {
                    if !next.starts_with('-') {
                        digital_signature = Some((*next).to_string());
                    }
                }
            }
        }

        Some(ParsedCycleLog {
            model: model?,
            serial_number,
            unit_number,
            water_quality,
            cycle_number: cycle_number?,
            cycle_date_time,
            program,
            target_temp,
            target_time,
            min_temp,
            min_pressure,
            max_temp,
            max_pressure,
            sterilizing_start,
            sterilizing_end,
            drying_start,
            drying_end,
            cycle_complete,
            digital_signature,
        })
    }
}

/// Build a timestamp from a `HH:MM:SS DD/MM/YYYY` capture set.
fn parse_timestamp(captures: &regex::Captures<'_>) -> Option<PrimitiveDateTime> {
    let hour: u8 = captures[1].parse().ok()?;
    let minute: u8 = captures[2].parse().ok()?;
    let second: u8 = captures[3].parse().ok()?;
    let day: u8 = captures[4].parse().ok()?;
    let month: u8 = captures[5].parse().ok()?;
    let year: i32 = captures[6].parse().ok()?;

    let date = Date::from_calendar_date(year, Month::try_from(month).ok()?, day).ok()?;
    let time = Time::from_hms(hour, minute, second).ok()?;
    Some(PrimitiveDateTime::new(date, time))
}

/// Parse a `<temp> C <pressure>kPa` value line following a label line.
fn steri_values(line: Option<&&str>) -> Option<(f64, u32)> {
    let captures = STERI_VALUES_RE.captures(line?)?;
    Some((captures[1].parse().ok()?, captures[2].parse().ok()?))
}

/// Extract the minute component of the first MM:SS pair on a phase line.
fn phase_minute(line: &str) -> Option<u32> {
    PHASE_MINUTE_RE.captures(line)?[1].parse().ok()
}
