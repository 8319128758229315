//! Autoclave client handle and connection tester.
//!
//! [`Autoclave`] bundles the device base URL, an optional known serial
//! number, the two timeout classes, and the transport. It is cheap to
//! construct and holds no connection state: every operation is an
//! independent request/response cycle, and the host application decides
//! the invocation cadence (e.g. a periodic sync job).
//!
//! # Timeout classes
//!
//! | Class | Default | Used by |
//! |-------|---------|---------|
//! | discovery | 5 s | index fetch, directory listing, connection test |
//! | data | 10 s | cycle telemetry, archive page scrape |
//!
//! The device sits on a LAN and normally answers quickly, but its PHP
//! interface is slow under load and telemetry payloads are larger, hence
//! the doubled data window.
//!
//! # Example
//!
//! ```no_run
//! use scilog_core::Autoclave;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let device = Autoclave::new("192.168.1.50", 80)?
//!     .with_serial("710123B00004");
//!
//! let test = device.test_connection().await;
//! if test.ok {
//!     println!("Connected to {}", test.model.as_deref().unwrap_or("?"));
//! } else {
//!     println!("Failed: {}", test.error.as_deref().unwrap_or("?"));
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use tracing::{debug, info, warn};

use scilog_types::{CycleIndex, ParsedCycleLog};

use crate::error::{Error, Result};
use crate::transport::{HttpTransport, Transport};

/// Default timeout for discovery-class calls (index, listing, test).
pub const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default timeout for data-class calls (telemetry, archive scrape).
pub const DEFAULT_DATA_TIMEOUT: Duration = Duration::from_secs(10);

/// Model string reported when a connection succeeds but no cycle log
/// could be resolved to identify the unit.
pub const UNKNOWN_MODEL: &str = "Unknown Autoclave";

/// Handle to one networked autoclave.
///
/// Generic over [`Transport`] so tests can inject
/// [`MockTransport`](crate::mock::MockTransport).
#[derive(Debug, Clone)]
pub struct Autoclave<T: Transport = HttpTransport> {
    transport: T,
    base_url: String,
    serial_number: Option<String>,
    discovery_timeout: Duration,
    data_timeout: Duration,
}

/// Outcome of a connection test.
///
/// This is a structured result rather than a `Result` because the test
/// exists to be called from setup/UI flows that need a message to
/// render, never a crash. `error` is actionable text ("Connection
/// timeout", "HTTP 404: Not Found", ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTest {
    /// Whether the device answered with a usable cycle index.
    pub ok: bool,
    /// Best-effort model string; [`UNKNOWN_MODEL`] when the device is
    /// reachable but no cycle log identified it.
    pub model: Option<String>,
    /// Failure description when `ok` is false.
    pub error: Option<String>,
}

impl ConnectionTest {
    fn success(model: String) -> Self {
        Self {
            ok: true,
            model: Some(model),
            error: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            model: None,
            error: Some(message.into()),
        }
    }
}

impl Autoclave<HttpTransport> {
    /// Create a handle for the device at `host:port`.
    ///
    /// `host` is an IP address or hostname without scheme or path.
    pub fn new(host: &str, port: u16) -> Result<Self> {
        Self::with_transport(host, port, HttpTransport::new()?)
    }
}

impl<T: Transport> Autoclave<T> {
    /// Create a handle with a custom transport.
    pub fn with_transport(host: &str, port: u16, transport: T) -> Result<Self> {
        let host = host.trim();
        if host.is_empty()
            || host.contains('/')
            || host.contains("://")
            || host.chars().any(char::is_whitespace)
        {
            return Err(Error::InvalidHost(host.to_string()));
        }
        Ok(Self {
            transport,
            base_url: format!("http://{host}:{port}"),
            serial_number: None,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
            data_timeout: DEFAULT_DATA_TIMEOUT,
        })
    }

    /// Record the device's serial number.
    ///
    /// When set, cycle data paths are constructed deterministically
    /// without an archive-catalog round-trip.
    #[must_use]
    pub fn with_serial(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    /// Override the discovery and data timeout windows.
    #[must_use]
    pub fn with_timeouts(mut self, discovery: Duration, data: Duration) -> Self {
        self.discovery_timeout = discovery;
        self.data_timeout = data;
        self
    }

    /// The device base URL, e.g. `http://192.168.1.50:80`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The configured serial number, if any.
    #[must_use]
    pub fn serial_number(&self) -> Option<&str> {
        self.serial_number.as_deref()
    }

    pub(crate) fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base_url, path_and_query)
    }

    pub(crate) fn discovery_timeout(&self) -> Duration {
        self.discovery_timeout
    }

    pub(crate) fn data_timeout(&self) -> Duration {
        self.data_timeout
    }

    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    /// Verify the device is reachable and identify its model.
    ///
    /// Issues a single bounded GET against the cycle-index endpoint and
    /// classifies the outcome. Never returns an error: failures come back
    /// as `ok: false` with renderable text. On success the model string
    /// is resolved best-effort from the most recent cycle's log; failing
    /// that does not downgrade the test, the model just falls back to
    /// [`UNKNOWN_MODEL`].
    pub async fn test_connection(&self) -> ConnectionTest {
        let url = self.url("/data/cycles.cgi");
        let response = match self
            .transport
            .get("test_connection", &url, self.discovery_timeout)
            .await
        {
            Err(Error::Timeout { .. }) => {
                warn!(url, "connection test timed out");
                return ConnectionTest::failure("Connection timeout");
            }
            Err(e) => {
                warn!(url, error = %e, "connection test failed");
                return ConnectionTest::failure(e.to_string());
            }
            Ok(response) => response,
        };

        if !response.is_success() {
            let err = Error::http_status(response.status);
            warn!(url, status = response.status, "connection test rejected");
            return ConnectionTest::failure(err.to_string());
        }

        match serde_json::from_str::<Vec<CycleIndex>>(&response.body) {
            Ok(index) => debug!(years = index.len(), "cycle index decoded"),
            Err(e) => {
                warn!(url, error = %e, "connection test body is not a cycle index");
                return ConnectionTest::failure("Invalid response format from autoclave");
            }
        }

        let model = self.resolve_model().await.unwrap_or_else(|| {
            debug!("no cycle log available to identify model");
            UNKNOWN_MODEL.to_string()
        });
        info!(model, "connection test succeeded");
        ConnectionTest::success(model)
    }

    /// Best-effort model lookup via the most recent cycle's log.
    async fn resolve_model(&self) -> Option<String> {
        let latest = match self.latest_cycle().await {
            Ok(latest) => latest?,
            Err(e) => {
                debug!(error = %e, "latest-cycle lookup failed during model resolution");
                return None;
            }
        };
        match self.fetch_cycle_data_from_info(&latest).await {
            Ok(telemetry) => ParsedCycleLog::parse(&telemetry.raw_log).map(|log| log.model),
            Err(e) => {
                debug!(
                    cycle_number = latest.cycle_number,
                    error = %e,
                    "telemetry fetch failed during model resolution",
                );
                None
            }
        }
    }
}
