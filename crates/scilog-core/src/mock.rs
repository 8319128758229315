//! Scripted transport for testing.
//!
//! [`MockTransport`] stands in for the real HTTP transport so tests run
//! without a device on the network. Responses are scripted per URL
//! fragment, failures (timeouts, refused connections) can be injected,
//! and every request URL is recorded so tests can assert on which
//! endpoints were hit — the fallback-chain tests rely on exactly that.
//!
//! # Example
//!
//! ```
//! use scilog_core::mock::MockTransport;
//! use scilog_core::Autoclave;
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = MockTransport::new();
//!     transport.respond("/data/cycles.cgi", 200, "[]");
//!
//!     let device = Autoclave::with_transport("10.0.0.2", 80, transport.clone()).unwrap();
//!     let _ = device.test_connection().await;
//!     assert_eq!(transport.call_count("/data/cycles.cgi"), 1);
//! }
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::transport::{RawResponse, Transport};

/// What a scripted route should produce.
#[derive(Debug, Clone)]
enum Outcome {
    /// Return this status and body.
    Respond { status: u16, body: String },
    /// Fail as a timeout of the requested window.
    TimeOut,
    /// Fail as a connection-level error with this message.
    Refuse(String),
}

#[derive(Debug, Clone)]
struct Route {
    fragment: String,
    outcome: Outcome,
}

#[derive(Debug, Default)]
struct Inner {
    routes: Vec<Route>,
    calls: Vec<String>,
}

/// A scripted [`Transport`].
///
/// Cloning shares the script and the call log, so a test can keep its
/// own handle for assertions after moving a clone into the client.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    inner: Arc<Mutex<Inner>>,
}

impl MockTransport {
    /// Create an empty transport. Requests hitting no scripted route
    /// fail with a transport error naming the URL, so a missing script
    /// line shows up clearly in test output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for URLs containing `fragment`.
    ///
    /// Routes are matched in the order they were added; the first
    /// matching fragment wins.
    pub fn respond(&self, fragment: &str, status: u16, body: &str) {
        self.push(fragment, Outcome::Respond {
            status,
            body: body.to_string(),
        });
    }

    /// Script a timeout for URLs containing `fragment`.
    pub fn time_out(&self, fragment: &str) {
        self.push(fragment, Outcome::TimeOut);
    }

    /// Script a connection-level failure for URLs containing `fragment`.
    pub fn refuse(&self, fragment: &str, message: &str) {
        self.push(fragment, Outcome::Refuse(message.to_string()));
    }

    /// Number of requests whose URL contained `fragment`.
    #[must_use]
    pub fn call_count(&self, fragment: &str) -> usize {
        self.inner
            .lock()
            .expect("mock transport lock")
            .calls
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }

    /// Every requested URL, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().expect("mock transport lock").calls.clone()
    }

    fn push(&self, fragment: &str, outcome: Outcome) {
        self.inner
            .lock()
            .expect("mock transport lock")
            .routes
            .push(Route {
                fragment: fragment.to_string(),
                outcome,
            });
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, operation: &str, url: &str, timeout: Duration) -> Result<RawResponse> {
        let outcome = {
            let mut inner = self.inner.lock().expect("mock transport lock");
            inner.calls.push(url.to_string());
            inner
                .routes
                .iter()
                .find(|route| url.contains(&route.fragment))
                .map(|route| route.outcome.clone())
        };

        match outcome {
            Some(Outcome::Respond { status, body }) => Ok(RawResponse { status, body }),
            Some(Outcome::TimeOut) => Err(Error::timeout(operation, timeout)),
            Some(Outcome::Refuse(message)) => Err(Error::Transport(message)),
            None => Err(Error::Transport(format!("no scripted response for {url}"))),
        }
    }
}
