//! Clock abstraction so services never read wall-clock time directly.
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use slotwise_core::clock::{Clock, MockClock};
//!
//! let clock = MockClock::at(Utc.with_ymd_and_hms(2025, 1, 6, 8, 0, 0).unwrap());
//! clock.advance(Duration::minutes(30));
//! assert_eq!(clock.now(), Utc.with_ymd_and_hms(2025, 1, 6, 8, 30, 0).unwrap());
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic tests.
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(instant)) }
    }

    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        *current += duration;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner) = instant;
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
