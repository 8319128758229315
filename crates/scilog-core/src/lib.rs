//! HTTP client for STATCLAVE G4 networked steam autoclaves.
//!
//! This crate discovers, polls, and parses sterilization-cycle records
//! from STATCLAVE-G4-compatible units over their embedded HTTP
//! interface. The device offers no stable API — the catalog is scraped
//! out of an HTML page, directory listings depend on firmware, and the
//! cycle log is free text — so every operation here is built around
//! tolerant parsing and explicit fallback strategies.
//!
//! # What lives here
//!
//! - [`Autoclave`] — the per-device handle; connection tester.
//! - [`archive`] — cycle catalog scraping and date filtering.
//! - [`listing`] — per-day file enumeration with a fallback chain.
//! - [`cycle_data`] — telemetry fetch with three path-resolution
//!   strategies.
//! - [`sync`] — month/day enumeration and incremental sync.
//! - [`duration`] — provenance-tagged cycle duration derivation.
//! - [`mock`] — scripted transport for tests.
//!
//! This subsystem does not persist records, authenticate users, render
//! UI, or schedule polling; the host application supplies host/port
//! (and optionally the unit serial) and drives the cadence.
//!
//! # Quick Start
//!
//! ```no_run
//! use scilog_core::Autoclave;
//! use scilog_types::{CycleType, ParsedCycleLog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let device = Autoclave::new("192.168.1.50", 80)?;
//!
//!     // Everything newer than the last synced cycle.
//!     for cycle in device.cycles_since(1700).await? {
//!         let telemetry = device
//!             .fetch_cycle_data(cycle.year, cycle.month, cycle.day, cycle.cycle_number)
//!             .await?;
//!         if let Some(log) = ParsedCycleLog::parse(&telemetry.raw_log) {
//!             let kind = CycleType::classify(
//!                 telemetry.runmode.as_deref(),
//!                 telemetry.status_line.as_deref(),
//!                 None,
//!             );
//!             println!("cycle {} ({kind}): {}", log.cycle_number, log.model);
//!         }
//!     }
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod client;
pub mod cycle_data;
pub mod duration;
pub mod error;
pub mod listing;
pub mod mock;
pub mod sync;
pub mod transport;

pub use archive::filter_by_date;
pub use client::{
    Autoclave, ConnectionTest, DEFAULT_DATA_TIMEOUT, DEFAULT_DISCOVERY_TIMEOUT, UNKNOWN_MODEL,
};
pub use duration::{cycle_duration, DurationEstimate, DurationSource, DEFAULT_CYCLE_MINUTES};
pub use error::{Error, Result};
pub use transport::{HttpTransport, RawResponse, Transport};

// Re-export the data model for downstream convenience.
pub use scilog_types::{
    CycleIndex, CycleInfo, CycleTelemetry, CycleType, DayCycles, FileInfo, FlattenedCycle,
    ParsedCycleLog,
};
