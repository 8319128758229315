//! Platform-agnostic types for STATCLAVE G4 sterilization cycle records.
//!
//! This crate holds the data model and pure parsers shared by the scilog
//! integration stack: no I/O, no async, no device communication. The
//! companion crate `scilog-core` layers the HTTP client on top.
//!
//! # What lives here
//!
//! - **Filename codec** ([`filename`]): parse/build the device's
//!   `S{YYYYMMDD}_{cycle}_{serial}.{txt|cpt}` log filename convention.
//! - **Cycle log parser** ([`log`]): turn the device's free-text cycle
//!   report into a [`ParsedCycleLog`].
//! - **Cycle type classifier** ([`CycleType::classify`]): best-effort
//!   mapping of device status/program strings to a canonical
//!   sterilization cycle type.
//! - **Wire types** ([`types`]): the archive catalog ([`CycleInfo`]),
//!   telemetry payload ([`CycleTelemetry`]), and index/enumeration
//!   shapes.
//!
//! # Example
//!
//! ```
//! use scilog_types::{CycleType, FileInfo, ParsedCycleLog};
//!
//! let info = FileInfo::parse("S20251008_01755_710123B00004.txt").unwrap();
//! assert_eq!(info.cycle_number, 1755);
//!
//! let log = ParsedCycleLog::parse(
//!     "STATCLAVE G4 SBS1R118\r\nCYCLE NUMBER 001755\r\n",
//! )
//! .unwrap();
//! assert_eq!(log.cycle_number, 1755);
//!
//! let kind = CycleType::classify(None, None, Some("solid_wrapped_132_4min"));
//! assert_eq!(kind, CycleType::SteamPrevacuum);
//! ```

pub mod error;
pub mod filename;
pub mod log;
pub mod types;

pub use error::ParseError;
pub use filename::{
    cycle_file_name, cycle_file_path, day_directory, scan_file_names, FileInfo, DEVICE_LOG_ROOT,
};
pub use log::ParsedCycleLog;
pub use types::{
    CycleIndex, CycleInfo, CycleTelemetry, CycleType, DayCycles, DayEntry, FlattenedCycle,
    MonthEntry,
};
