//! Core types for STATCLAVE G4 sterilization cycle data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use time::OffsetDateTime;

/// One year of the device's self-reported cycle catalog.
///
/// Returned by the `/data/cycles.cgi` endpoint as a JSON array of these
/// entries. Depending on firmware, month entries may or may not be broken
/// down into days.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleIndex {
    /// Calendar year (e.g. 2025).
    pub year: i32,
    /// Months for which the device holds cycle logs.
    pub months: Vec<MonthEntry>,
}

/// One month within a [`CycleIndex`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonthEntry {
    /// Month number, 1-12.
    pub month: u8,
    /// Per-day breakdown. Empty when the firmware only reports months.
    #[cfg_attr(feature = "serde", serde(default))]
    pub days: Vec<DayEntry>,
}

/// One day within a [`MonthEntry`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayEntry {
    /// Day of month, 1-31.
    pub day: u8,
    /// Cycle numbers recorded on this day.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cycles: Vec<u32>,
}

/// One cycle as advertised by the device's archive page.
///
/// Scraped from the `cyclesInfo = [...]` array embedded in
/// `/us/archives.php`. Immutable once parsed; the device's own
/// `cycle_start_time` is authoritative over any caller-supplied date.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleInfo {
    /// Device-internal record identifier.
    pub records_id: i64,
    /// Cycle start time as Unix epoch seconds.
    pub cycle_start_time: i64,
    /// Log file stem, e.g. `S20251008_0001755_710123B00004` (no extension).
    pub file_name: String,
    /// Monotonically increasing cycle number assigned by the device.
    pub cycle_number: u32,
    /// Program identifier string, e.g. `STATCLAVE_120V_solid_wrapped_132_4min`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub cycle_id: String,
}

impl CycleInfo {
    /// Cycle start time as a UTC timestamp.
    ///
    /// Returns `None` when the device reported an epoch value outside the
    /// representable range.
    pub fn start_time(&self) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.cycle_start_time).ok()
    }

    /// Whether this cycle started on the given UTC calendar date.
    ///
    /// When `day` is `None`, only year and month are compared.
    pub fn matches_date(&self, year: i32, month: u8, day: Option<u8>) -> bool {
        let Some(t) = self.start_time() else {
            return false;
        };
        t.year() == year
            && u8::from(t.month()) == month
            && day.is_none_or(|d| t.day() == d)
    }
}

/// Raw sampled data for one cycle, fetched from `/data/cycleData.php`.
///
/// Field names are renamed from the device's wire format; the series
/// fields are kept as the raw delimited strings the device emits, since
/// the delimiter varies by firmware (comma or whitespace).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CycleTelemetry {
    /// Cycle date as reported by the device.
    #[cfg_attr(feature = "serde", serde(default))]
    pub date: String,
    /// Cycle number as reported by the device (may carry leading zeros).
    #[cfg_attr(feature = "serde", serde(default))]
    pub number: String,
    /// Device run mode string.
    #[cfg_attr(feature = "serde", serde(default))]
    pub runmode: Option<String>,
    /// Display units configured on the device.
    #[cfg_attr(feature = "serde", serde(default, rename = "display_units"))]
    pub display_units: Option<String>,
    /// Free-text cycle log. Parse with
    /// [`ParsedCycleLog::parse`](crate::log::ParsedCycleLog::parse).
    #[cfg_attr(feature = "serde", serde(default, rename = "log"))]
    pub raw_log: String,
    /// Cycle status line (e.g. "Cycle complete", "Flash cycle").
    #[cfg_attr(feature = "serde", serde(default, rename = "status"))]
    pub status_line: Option<String>,
    /// X-axis sample points, raw delimited string.
    #[cfg_attr(feature = "serde", serde(default))]
    pub x_axis_points: Option<String>,
    /// Temperature series, raw delimited string.
    #[cfg_attr(feature = "serde", serde(default, rename = "temp"))]
    pub temperature_series: String,
    /// Pressure series, raw delimited string.
    #[cfg_attr(feature = "serde", serde(default, rename = "pressure"))]
    pub pressure_series: String,
    /// Whether the device marked the cycle as successful.
    #[cfg_attr(feature = "serde", serde(default))]
    pub succeeded: bool,
}

/// A (year, month, day, cycle number) tuple used for enumeration and sync.
///
/// Produced by flattening the archive catalog through the filename codec;
/// catalog entries whose filenames do not match the grammar are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlattenedCycle {
    /// Calendar year from the filename.
    pub year: i32,
    /// Month from the filename, 1-12.
    pub month: u8,
    /// Day from the filename, 1-31.
    pub day: u8,
    /// Cycle number, compared as an integer (padding ignored).
    pub cycle_number: u32,
    /// The filename date as a calendar date.
    pub date: time::Date,
}

/// Cycle numbers recorded on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayCycles {
    /// Day of month, 1-31.
    pub day: u8,
    /// Cycle numbers, zero-padded to the canonical 5 digits.
    pub cycle_numbers: Vec<String>,
}

/// Canonical sterilization cycle type.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new cycle types
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub enum CycleType {
    /// Flash / immediate-use steam cycle.
    SteamFlash,
    /// Pre-vacuum steam cycle.
    SteamPrevacuum,
    /// Gravity-displacement steam cycle.
    SteamGravity,
}

impl CycleType {
    /// Classify a cycle from the status/runmode/program strings the device
    /// reports.
    ///
    /// This is a best-effort heuristic, not an authoritative device field:
    /// the STATCLAVE interface never labels cycles with a canonical type,
    /// so we match substrings in precedence order. The status line is
    /// inspected first, then the run mode, then the program identifier.
    /// A program identifier containing "132" or "134" (a sterilization
    /// temperature encoded in the program name) implies a pre-vacuum
    /// cycle. When nothing matches, gravity displacement is assumed.
    ///
    /// # Examples
    ///
    /// ```
    /// use scilog_types::CycleType;
    ///
    /// assert_eq!(
    ///     CycleType::classify(None, Some("Flash cycle"), None),
    ///     CycleType::SteamFlash,
    /// );
    /// assert_eq!(
    ///     CycleType::classify(None, None, Some("STATCLAVE_120V_solid_wrapped_132_4min")),
    ///     CycleType::SteamPrevacuum,
    /// );
    /// assert_eq!(CycleType::classify(None, None, None), CycleType::SteamGravity);
    /// ```
    #[must_use]
    pub fn classify(
        runmode: Option<&str>,
        status: Option<&str>,
        cycle_id: Option<&str>,
    ) -> Self {
        if let Some(found) = status.and_then(Self::from_text) {
            return found;
        }
        if let Some(found) = runmode.and_then(Self::from_text) {
            return found;
        }
        if let Some(id) = cycle_id {
            if let Some(found) = Self::from_text(id) {
                return found;
            }
            // Temperature heuristic: 132/134 C programs run pre-vacuum.
            if id.contains("132") || id.contains("134") {
                return CycleType::SteamPrevacuum;
            }
        }
        CycleType::SteamGravity
    }

    /// Match flash/prevacuum keywords in a free-text field.
    fn from_text(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        if lower.contains("flash") || lower.contains("immediate") {
            return Some(CycleType::SteamFlash);
        }
        if lower.contains("prevac") || lower.contains("pre-vac") {
            return Some(CycleType::SteamPrevacuum);
        }
        None
    }
}

impl fmt::Display for CycleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleType::SteamFlash => write!(f, "Steam Flash"),
            CycleType::SteamPrevacuum => write!(f, "Steam Pre-Vacuum"),
            CycleType::SteamGravity => write!(f, "Steam Gravity"),
        }
    }
}
