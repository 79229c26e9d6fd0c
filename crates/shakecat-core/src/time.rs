//! Monotonic session time in milliseconds.
//!
//! The engine never reads a clock itself; hosts pass `now_ms` in. These
//! helpers give hosts a consistent source for it.

use std::time::Instant;

pub trait Clock {
    /// Milliseconds since the clock's epoch. Never decreases.
    fn now_ms(&self) -> u64;
}

/// Milliseconds elapsed since construction.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    epoch: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Milliseconds from the epoch to `at`, zero if `at` predates it.
    pub fn ms_at(&self, at: Instant) -> u64 {
        at.saturating_duration_since(self.epoch).as_millis() as u64
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.ms_at(Instant::now())
    }
}

/// Hand-driven clock for replays and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    pub fn advance(&mut self, ms: u64) -> u64 {
        self.now_ms = self.now_ms.saturating_add(ms);
        self.now_ms
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_monotonic() {
        let mut c = ManualClock::new(100);
        assert_eq!(c.advance(50), 150);
        assert_eq!(c.now_ms(), 150);
        assert_eq!(c.advance(u64::MAX), u64::MAX);
    }

    #[test]
    fn test_monotonic_clock_never_decreases() {
        let c = MonotonicClock::new();
        let a = c.now_ms();
        let b = c.now_ms();
        assert!(b >= a);
        assert_eq!(c.ms_at(c.epoch()), 0);
    }
}
