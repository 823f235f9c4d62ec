//! Time source abstraction for lock-window checks.
//!
//! # Responsibility
//! - Supply "now" in epoch milliseconds to services evaluating the 24h
//!   mutation window.
//!
//! # Invariants
//! - Policy code never reads the system clock directly; it receives a
//!   timestamp from a `Clock` so tests can pin time.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of current time in Unix epoch milliseconds.
pub trait Clock {
    fn now_epoch_ms(&self) -> i64;
}

/// Wall-clock implementation backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_millis() as i64,
            // Pre-epoch system clocks are treated as epoch start rather
            // than panicking inside a request worker.
            Err(_) => 0,
        }
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now_ms: i64,
}

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self { now_ms }
    }
}

impl Clock for FixedClock {
    fn now_epoch_ms(&self) -> i64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FixedClock, SystemClock};

    #[test]
    fn system_clock_returns_positive_epoch_ms() {
        assert!(SystemClock.now_epoch_ms() > 1_600_000_000_000);
    }

    #[test]
    fn fixed_clock_returns_configured_instant() {
        let clock = FixedClock::new(1_700_000_000_000);
        assert_eq!(clock.now_epoch_ms(), 1_700_000_000_000);
        assert_eq!(clock.now_epoch_ms(), 1_700_000_000_000);
    }
}
