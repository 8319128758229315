//! Cycle telemetry fetcher.
//!
//! Retrieving one cycle's telemetry requires the exact on-device `.cpt`
//! path, and how that path is resolved depends on what the caller knows:
//!
//! - **Serial known** (configured via
//!   [`Autoclave::with_serial`](crate::Autoclave::with_serial)): the
//!   path is constructed deterministically — no resolution round-trip.
//! - **Serial unknown**: the archive catalog is searched for the entry
//!   whose filename encodes the cycle number, and the path is derived
//!   from that entry's own epoch timestamp. The device's
//!   timestamp is authoritative: it may name a different day than the
//!   caller guessed, and the device wins.
//! - **Catalog entry in hand**: [`fetch_cycle_data_from_info`]
//!   skips the search for the hot path where the caller just obtained
//!   the entry from the index fetcher.
//!
//! [`fetch_cycle_data_from_info`]: Autoclave::fetch_cycle_data_from_info
//!
//! Unlike discovery operations, failures here propagate as typed errors:
//! by this point the caller has committed to a specific cycle, and a
//! silently-empty result would hide a real defect such as wrong path
//! construction or a device whose serial changed.

use time::{Date, Month, OffsetDateTime};
use tracing::debug;

use scilog_types::{filename, CycleInfo, CycleTelemetry, FileInfo};

use crate::client::Autoclave;
use crate::error::{Error, Result};
use crate::transport::Transport;

impl<T: Transport> Autoclave<T> {
    /// Fetch one cycle's telemetry by date and cycle number.
    ///
    /// Resolution strategy depends on whether a serial number is
    /// configured on this handle; see the module docs. Returns
    /// [`Error::CycleNotFound`] when the archive search comes up empty
    /// and [`Error::Http`] on a non-2xx telemetry response.
    pub async fn fetch_cycle_data(
        &self,
        year: i32,
        month: u8,
        day: u8,
        cycle_number: u32,
    ) -> Result<CycleTelemetry> {
        if let Some(serial) = self.serial_number() {
            let date = Month::try_from(month)
                .ok()
                .and_then(|m| Date::from_calendar_date(year, m, day).ok())
                .ok_or(Error::InvalidDate { year, month, day })?;
            let path = filename::cycle_file_path(date, cycle_number, serial, "cpt");
            debug!(cycle_number, path, "resolved cycle path from serial");
            return self.fetch_cycle_data_by_path(&path, date, cycle_number).await;
        }

        // No serial: the archive catalog is the only source of the file
        // stem, and its timestamp overrides the caller-supplied date.
        let cycles = self.fetch_all_cycles().await?;
        // Padding of the cycle number varies across firmware, so match
        // numerically rather than on the padded substring.
        let info = cycles
            .iter()
            .find(|c| {
                FileInfo::parse(&c.file_name).is_some_and(|f| f.cycle_number == cycle_number)
            })
            .ok_or(Error::CycleNotFound { cycle_number })?;
        self.fetch_cycle_data_from_info(info).await
    }

    /// Fetch telemetry for an already-resolved catalog entry.
    pub async fn fetch_cycle_data_from_info(&self, info: &CycleInfo) -> Result<CycleTelemetry> {
        let start = info.start_time().ok_or_else(|| {
            Error::malformed(format!(
                "cycle {} has an out-of-range start time",
                info.cycle_number,
            ))
        })?;
        let path = info.log_path("cpt").ok_or_else(|| {
            Error::malformed(format!("cycle {} has no resolvable path", info.cycle_number))
        })?;
        debug!(cycle_number = info.cycle_number, path, "resolved cycle path from catalog");
        self.fetch_cycle_data_by_path(&path, start.date(), info.cycle_number)
            .await
    }

    /// Issue the telemetry GET for a fully-resolved `.cpt` path.
    async fn fetch_cycle_data_by_path(
        &self,
        path: &str,
        date: Date,
        cycle_number: u32,
    ) -> Result<CycleTelemetry> {
        let stamp = OffsetDateTime::now_utc().unix_timestamp();
        let url = self.url(&format!(
            "/data/cycleData.php?filename={path}&t={stamp}&year={:04}&month={:02}&day={:02}&cycle={cycle_number:05}",
            date.year(),
            u8::from(date.month()),
            date.day(),
        ));
        let response = self
            .transport()
            .get("fetch_cycle_data", &url, self.data_timeout())
            .await?;
        if !response.is_success() {
            return Err(Error::http_status(response.status));
        }
        serde_json::from_str(&response.body)
            .map_err(|e| Error::malformed(format!("cycle data did not decode: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;

    const TELEMETRY: &str = r#"{
        "date": "2025/10/08", "number": "001755",
        "log": "STATCLAVE G4 SBS1R118\r\nCYCLE NUMBER 001755\r\n",
        "temp": "121.0,130.2,135.1", "pressure": "101,210,315",
        "succeeded": true
    }"#;

    fn catalog_html() -> &'static str {
        r#"cyclesInfo = [
            {"records_id": 1, "cycle_start_time": 1759913692,
             "file_name": "S20251008_0001755_710123B00004",
             "cycle_number": 1755, "cycle_id": ""}
        ];"#
    }

    #[tokio::test]
    async fn test_serial_path_is_deterministic() {
        let transport = MockTransport::new();
        transport.respond("/data/cycleData.php", 200, TELEMETRY);
        let device = Autoclave::with_transport("10.0.0.2", 80, transport)
            .unwrap()
            .with_serial("710123B00004");

        let telemetry = device.fetch_cycle_data(2025, 10, 8, 1755).await.unwrap();
        assert!(telemetry.succeeded);

        // No catalog round-trip, and the padded path was requested.
        assert_eq!(device.transport().call_count("/us/archives.php"), 0);
        let calls = device.transport().calls();
        assert!(calls[0].contains(
            "filename=/opt/data/scilog/2025/10/08/S20251008_01755_710123B00004.cpt"
        ));
        assert!(calls[0].contains("cycle=01755"));
        assert!(calls[0].contains("year=2025"));
    }

    #[tokio::test]
    async fn test_invalid_date_with_serial() {
        let transport = MockTransport::new();
        let device = Autoclave::with_transport("10.0.0.2", 80, transport)
            .unwrap()
            .with_serial("710123B00004");
        let err = device.fetch_cycle_data(2025, 2, 30, 1).await.unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
    }

    #[tokio::test]
    async fn test_archive_search_uses_device_timestamp() {
        let transport = MockTransport::new();
        transport.respond("/us/archives.php", 200, catalog_html());
        transport.respond("/data/cycleData.php", 200, TELEMETRY);
        let device = Autoclave::with_transport("10.0.0.2", 80, transport).unwrap();

        // Caller guesses the wrong day; the catalog timestamp (Oct 8)
        // must win.
        let telemetry = device.fetch_cycle_data(2025, 10, 9, 1755).await.unwrap();
        assert_eq!(telemetry.number, "001755");

        let calls = device.transport().calls();
        let data_call = calls.iter().find(|c| c.contains("cycleData")).unwrap();
        assert!(data_call.contains("/2025/10/08/S20251008_0001755_710123B00004.cpt"));
        assert!(data_call.contains("day=08"));
    }

    #[tokio::test]
    async fn test_missing_cycle_is_not_found() {
        let transport = MockTransport::new();
        transport.respond("/us/archives.php", 200, catalog_html());
        let device = Autoclave::with_transport("10.0.0.2", 80, transport).unwrap();
        let err = device.fetch_cycle_data(2025, 10, 8, 9999).await.unwrap_err();
        assert!(matches!(err, Error::CycleNotFound { cycle_number: 9999 }));
    }

    #[tokio::test]
    async fn test_telemetry_http_error_propagates() {
        let transport = MockTransport::new();
        transport.respond("/data/cycleData.php", 404, "");
        let device = Autoclave::with_transport("10.0.0.2", 80, transport)
            .unwrap()
            .with_serial("710123B00004");
        let err = device.fetch_cycle_data(2025, 10, 8, 1755).await.unwrap_err();
        assert!(matches!(err, Error::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_telemetry_garbage_body_is_malformed() {
        let transport = MockTransport::new();
        transport.respond("/data/cycleData.php", 200, "<html>oops</html>");
        let device = Autoclave::with_transport("10.0.0.2", 80, transport)
            .unwrap()
            .with_serial("710123B00004");
        let err = device.fetch_cycle_data(2025, 10, 8, 1755).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_fetch_from_info_skips_search() {
        let transport = MockTransport::new();
        transport.respond("/data/cycleData.php", 200, TELEMETRY);
        let device = Autoclave::with_transport("10.0.0.2", 80, transport).unwrap();

        let info = CycleInfo {
            records_id: 1,
            cycle_start_time: 1_759_913_692,
            file_name: "S20251008_0001755_710123B00004".into(),
            cycle_number: 1755,
            cycle_id: String::new(),
        };
        let telemetry = device.fetch_cycle_data_from_info(&info).await.unwrap();
        assert_eq!(telemetry.temperature_series, "121.0,130.2,135.1");
        assert_eq!(device.transport().call_count("/us/archives.php"), 0);
    }
}
