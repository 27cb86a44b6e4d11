//! Time sources for timestamps and file-name dates

use std::fmt;

use parking_lot::Mutex;
use time::{Duration, OffsetDateTime};

/// Source of "now"
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current instant
    fn now(&self) -> OffsetDateTime;
}

/// Wall clock in the local offset, falling back to UTC when the offset
/// cannot be determined (e.g. multi-threaded processes on some Unix targets)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    /// Create a clock frozen at `now`
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `now`
    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock() = now;
    }

    /// Move forward by `by`
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn manual_clock_moves_only_on_request() {
        let clock = ManualClock::new(datetime!(2024-03-07 23:59:59 UTC));
        assert_eq!(clock.now(), datetime!(2024-03-07 23:59:59 UTC));

        clock.advance(Duration::seconds(1));
        assert_eq!(clock.now(), datetime!(2024-03-08 00:00:00 UTC));

        clock.set(datetime!(2030-01-01 12:00 UTC));
        assert_eq!(clock.now().year(), 2030);
    }
}
