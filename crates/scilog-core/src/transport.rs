//! HTTP transport seam.
//!
//! All device communication goes through the [`Transport`] trait so tests
//! can substitute a scripted transport (see [`crate::mock`]) and assert
//! on which endpoints were hit. The production implementation,
//! [`HttpTransport`], wraps a shared [`reqwest::Client`].
//!
//! Every call carries its own timeout window. On expiry the in-flight
//! request future is dropped, which cancels the underlying connection
//! rather than leaking a socket, and the failure surfaces as
//! [`Error::Timeout`] — distinct from other transport failures so callers
//! can apply a timeout-specific retry policy.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use crate::error::{Error, Result};

/// A plain HTTP response: status code plus text body.
///
/// Non-2xx statuses are returned here rather than as errors; the caller
/// decides whether a 404 is fatal (targeted cycle fetch) or just means
/// "try the next strategy" (directory listing).
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over a single bounded GET against the device.
///
/// `operation` names the logical operation for timeout error context and
/// trace output; `url` is the fully-formed request URL.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue one GET with the given timeout window.
    async fn get(&self, operation: &str, url: &str, timeout: Duration) -> Result<RawResponse>;
}

/// Production transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with a fresh connection pool.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// Create a transport around an existing reqwest client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, operation: &str, url: &str, timeout: Duration) -> Result<RawResponse> {
        trace!(operation, url, ?timeout, "device GET");

        let request = self.client.get(url).timeout(timeout).send();
        // The outer timeout drops (and thereby cancels) the request
        // future; reqwest's per-request timeout additionally covers the
        // body read below.
        let response = match tokio::time::timeout(timeout, request).await {
            Err(_) => return Err(Error::timeout(operation, timeout)),
            Ok(Err(e)) if e.is_timeout() => return Err(Error::timeout(operation, timeout)),
            Ok(Err(e)) => return Err(Error::Transport(e.to_string())),
            Ok(Ok(response)) => response,
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if e.is_timeout() => return Err(Error::timeout(operation, timeout)),
            Err(e) => return Err(Error::Transport(e.to_string())),
        };

        trace!(operation, status, bytes = body.len(), "device response");
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_response_success_range() {
        assert!(RawResponse { status: 200, body: String::new() }.is_success());
        assert!(RawResponse { status: 204, body: String::new() }.is_success());
        assert!(!RawResponse { status: 199, body: String::new() }.is_success());
        assert!(!RawResponse { status: 302, body: String::new() }.is_success());
        assert!(!RawResponse { status: 404, body: String::new() }.is_success());
    }
}
