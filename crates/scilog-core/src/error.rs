//! Error types for scilog-core.
//!
//! The taxonomy mirrors what actually goes wrong against the device's
//! embedded web interface, and callers are expected to treat the
//! variants differently:
//!
//! | Variant | Meaning | Suggested handling |
//! |---------|---------|--------------------|
//! | [`Error::Timeout`] | Device did not answer in the window | Retry next sync pass; most common failure on a flaky LAN or a device busy printing |
//! | [`Error::Transport`] | Connection refused, reset, DNS, TLS | Check host/port; retry with backoff |
//! | [`Error::Http`] | Non-2xx status | Firmware lacks the endpoint or path construction is wrong |
//! | [`Error::MalformedResponse`] | 2xx but the body was undecodable | Firmware drift; report, do not retry blindly |
//! | [`Error::CycleNotFound`] | Targeted cycle absent from the catalog | Real defect (wrong number or purged log); surface to caller |
//!
//! Discovery-layer operations (directory listing, archive scraping with a
//! missing marker) recover locally to empty collections instead of using
//! these variants — absence of cycles is a legitimate device state, not a
//! fault. Targeted fetches propagate, because silent emptiness there
//! would hide a real resolution bug.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when communicating with a STATCLAVE autoclave.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error
/// variants in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The device did not respond within the allotted window.
    ///
    /// Always distinguished from [`Error::Transport`]: timeouts are the
    /// most common real-world condition and callers may want a
    /// different retry policy for them.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout window that elapsed.
        duration: Duration,
    },

    /// The device answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Status reason or response context.
        message: String,
    },

    /// Connection-level failure (refused, reset, unreachable).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The device answered 2xx but the body did not decode as expected.
    #[error("Invalid response format: {0}")]
    MalformedResponse(String),

    /// A specifically-targeted cycle was not present in the archive
    /// catalog.
    #[error("Cycle {cycle_number} not found in device archive")]
    CycleNotFound {
        /// The cycle number that was requested.
        cycle_number: u32,
    },

    /// The caller supplied an impossible calendar date.
    #[error("Invalid cycle date {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        /// Requested year.
        year: i32,
        /// Requested month.
        month: u8,
        /// Requested day.
        day: u8,
    },

    /// Host string could not form a device base URL.
    #[error("Invalid host: {0}")]
    InvalidHost(String),
}

impl Error {
    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create an HTTP status error, filling in the canonical reason
    /// phrase when one exists.
    pub fn http_status(status: u16) -> Self {
        let message = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Error")
            .to_string();
        Self::Http { status, message }
    }

    /// Create a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Whether this error is a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Result type alias using scilog-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::timeout("fetch_all_cycles", Duration::from_secs(5));
        assert!(err.to_string().contains("fetch_all_cycles"));
        assert!(err.to_string().contains("5s"));
        assert!(err.is_timeout());

        let err = Error::http_status(404);
        assert_eq!(err.to_string(), "HTTP 404: Not Found");

        let err = Error::CycleNotFound { cycle_number: 1755 };
        assert!(err.to_string().contains("1755"));

        let err = Error::malformed("no cyclesInfo marker");
        assert!(err.to_string().contains("cyclesInfo"));
    }

    #[test]
    fn test_unknown_status_reason() {
        let err = Error::http_status(599);
        assert_eq!(err.to_string(), "HTTP 599: Error");
    }
}
