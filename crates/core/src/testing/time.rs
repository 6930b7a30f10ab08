//! Time abstraction for testability
//!
//! Provides a trait-based approach to time operations that allows for
//! deterministic testing without relying on actual time passage. The
//! token cache in `lattice-infra` takes a [`Clock`] by injection so its
//! expiry-buffer behavior can be tested with a fake clock.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//!
//! use lattice_core::testing::{Clock, MockClock, SystemClock};
//!
//! // Use the system clock in production
//! let clock = SystemClock;
//! let _now = clock.now();
//!
//! // Use the mock clock in tests
//! let mock = MockClock::new();
//! let start = mock.now();
//! mock.advance(Duration::from_secs(5));
//! assert_eq!(mock.now().duration_since(start), Duration::from_secs(5));
//! ```

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

/// Trait for time operations to enable testing
pub trait Clock: Send + Sync {
    /// Get the current instant (monotonic time)
    fn now(&self) -> Instant;

    /// Get the current system time (wall clock)
    fn system_time(&self) -> SystemTime;
}

/// Real system clock implementation
///
/// Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn system_time(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// Mock clock for deterministic testing
///
/// Time only moves when [`MockClock::advance`] is called, so expiry logic
/// can be exercised without actually waiting.
#[derive(Debug, Clone)]
pub struct MockClock {
    base_instant: Instant,
    base_system: SystemTime,
    offset: Arc<Mutex<Duration>>,
}

impl MockClock {
    /// Create a mock clock anchored at the current time.
    pub fn new() -> Self {
        Self {
            base_instant: Instant::now(),
            base_system: SystemTime::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Move the clock forward by `delta`.
    pub fn advance(&self, delta: Duration) {
        if let Ok(mut offset) = self.offset.lock() {
            *offset += delta;
        }
    }

    fn offset(&self) -> Duration {
        self.offset.lock().map(|offset| *offset).unwrap_or_default()
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        self.base_instant + self.offset()
    }

    fn system_time(&self) -> SystemTime {
        self.base_system + self.offset()
    }
}
