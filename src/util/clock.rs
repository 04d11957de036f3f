//! Injectable time sources.
//!
//! Cache expiry reads the monotonic side, record timestamps the wall side.
//! Tests drive both through [`ManualClock`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use time::OffsetDateTime;

pub trait Clock: Send + Sync {
    /// Monotonic instant used for TTL bookkeeping.
    fn instant(&self) -> Instant;

    /// Wall-clock time stamped on new records.
    fn now_utc(&self) -> OffsetDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn instant(&self) -> Instant {
        Instant::now()
    }

    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base_instant: Instant,
    base_wall: OffsetDateTime,
    elapsed_nanos: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(OffsetDateTime::now_utc())
    }

    pub fn starting_at(wall: OffsetDateTime) -> Self {
        Self {
            base_instant: Instant::now(),
            base_wall: wall,
            elapsed_nanos: AtomicU64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        self.elapsed_nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn instant(&self) -> Instant {
        self.base_instant + self.elapsed()
    }

    fn now_utc(&self) -> OffsetDateTime {
        self.base_wall + self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn manual_clock_moves_both_sides_together() {
        let clock = ManualClock::starting_at(datetime!(2024-05-01 12:00 UTC));
        let start = clock.instant();

        clock.advance(Duration::from_secs(21));

        assert_eq!(clock.instant() - start, Duration::from_secs(21));
        assert_eq!(clock.now_utc(), datetime!(2024-05-01 12:00:21 UTC));
    }

    #[test]
    fn manual_clock_stands_still_without_advance() {
        let clock = ManualClock::new();
        assert_eq!(clock.instant(), clock.instant());
        assert_eq!(clock.now_utc(), clock.now_utc());
    }
}
