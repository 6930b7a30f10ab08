//! Retry policy for the HTTP transport
//!
//! One policy object owns every retry decision the transport makes, so the
//! rules are uniform across call sites and testable in isolation.
//!
//! Mutations against the control plane are not idempotent: a retried POST
//! that already reached the server can provision a second instance. The
//! policy therefore only replays a non-idempotent request when the
//! connection failed outright and no response can have been produced.

use std::time::Duration;

use reqwest::{Method, StatusCode};

/// Retry decisions and backoff schedule for [`super::HttpClient`].
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total number of attempts (initial try + retries).
    pub max_attempts: usize,
    /// Delay before the first retry; doubles on each subsequent retry.
    pub base_backoff: Duration,
    /// Ceiling for the backoff delay.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Exponential backoff for the given retry (1-based), capped at
    /// `max_backoff`.
    pub fn backoff_delay(&self, retry_number: usize) -> Duration {
        let shift = retry_number.saturating_sub(1).min(8) as u32;
        let delay = self.base_backoff.saturating_mul(1u32 << shift);
        delay.min(self.max_backoff)
    }

    /// Whether a received response warrants another attempt.
    ///
    /// Server errors are retried for idempotent requests only; once a
    /// mutation produced a response, replaying it risks duplicate side
    /// effects.
    pub fn should_retry_status(&self, method: &Method, status: StatusCode) -> bool {
        status.is_server_error() && is_idempotent(method)
    }

    /// Whether a transport-level failure warrants another attempt.
    ///
    /// Connection failures happen before the server saw the request and
    /// are safe to retry for every method. Timeouts and mid-request
    /// failures are ambiguous - the server may have acted - so they are
    /// only retried for idempotent requests.
    pub fn should_retry_error(&self, method: &Method, error: &reqwest::Error) -> bool {
        if error.is_connect() {
            return true;
        }
        is_idempotent(method) && (error.is_timeout() || error.is_request())
    }
}

fn is_idempotent(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD)
}
