//! Month/day enumeration and incremental sync.
//!
//! Cycle numbers are monotonically increasing integers assigned by the
//! device, and "greater than the last-synced number" is the sole
//! correctness criterion for sync — dates play no part. The device
//! offers no delta endpoint, so every sync pass re-reads the full
//! catalog; the catalog is small enough that this is acceptable.
//!
//! The device's embedded web server has been observed to be
//! single-threaded, and concurrent requests degrade its own UI.
//! Everything here issues its network calls sequentially; do not
//! "optimize" with concurrent fan-out.

use std::collections::BTreeMap;

use tracing::debug;

use scilog_types::{CycleInfo, DayCycles, FileInfo, FlattenedCycle};

use crate::archive::filter_by_date;
use crate::client::Autoclave;
use crate::error::Result;
use crate::transport::Transport;

impl<T: Transport> Autoclave<T> {
    /// Group one month's cycles by calendar day.
    ///
    /// Cycle numbers are normalized to the canonical 5-digit padding
    /// regardless of how wide the catalog stem padded them. Days are in
    /// ascending order.
    pub async fn fetch_month_cycles(&self, year: i32, month: u8) -> Result<Vec<DayCycles>> {
        let cycles = self.fetch_all_cycles().await?;
        let mut by_day: BTreeMap<u8, Vec<String>> = BTreeMap::new();
        for info in filter_by_date(&cycles, year, month, None) {
            let Some(file) = FileInfo::parse(&info.file_name) else {
                continue;
            };
            by_day
                .entry(file.day)
                .or_default()
                .push(format!("{:05}", file.cycle_number));
        }
        Ok(by_day
            .into_iter()
            .map(|(day, cycle_numbers)| DayCycles { day, cycle_numbers })
            .collect())
    }

    /// The newest cycle in the catalog, by the device's own start time.
    pub async fn latest_cycle(&self) -> Result<Option<CycleInfo>> {
        let cycles = self.fetch_all_cycles().await?;
        Ok(cycles.into_iter().max_by_key(|c| c.cycle_start_time))
    }

    /// Flatten the full catalog into (year, month, day, cycle) tuples.
    ///
    /// Catalog entries whose filenames do not match the grammar are
    /// discarded, not defaulted.
    pub async fn flatten_all_cycles(&self) -> Result<Vec<FlattenedCycle>> {
        let cycles = self.fetch_all_cycles().await?;
        Ok(flatten_catalog(&cycles))
    }

    /// Cycles strictly newer than a previously-synced cycle number.
    ///
    /// A full catalog re-scan each call. Re-running with the maximum
    /// cycle number of a previous result yields a disjoint set.
    pub async fn cycles_since(&self, last_synced: u32) -> Result<Vec<FlattenedCycle>> {
        let mut cycles = self.flatten_all_cycles().await?;
        cycles.retain(|c| c.cycle_number > last_synced);
        debug!(last_synced, count = cycles.len(), "incremental sync scan");
        Ok(cycles)
    }
}

/// Run a catalog through the filename codec, discarding misses.
pub(crate) fn flatten_catalog(cycles: &[CycleInfo]) -> Vec<FlattenedCycle> {
    cycles
        .iter()
        .filter_map(|info| FileInfo::parse(&info.file_name))
        .map(|file| FlattenedCycle {
            year: file.year,
            month: file.month,
            day: file.day,
            cycle_number: file.cycle_number,
            date: file.date,
        })
        .collect()
}
