use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;

/// Wall-clock instant, always UTC. Local conversions happen in the market tracker.
pub type Timestamp = DateTime<Utc>;

/// Source of wall-clock time for the feed.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// Clock that only moves when told to. Used to drive inactivity windows in tests.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        ManualClock {
            current: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *current += chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Elapsed time from `earlier` to `later`, saturating at zero.
pub fn elapsed_between(earlier: Timestamp, later: Timestamp) -> Duration {
    (later - earlier).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_advances() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 4, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        clock.advance(Duration::from_secs(90));
        assert_eq!(clock.now(), start + chrono::Duration::seconds(90));
    }

    #[test]
    fn elapsed_saturates_backwards() {
        let a = Utc.with_ymd_and_hms(2025, 1, 1, 4, 0, 0).unwrap();
        let b = a + chrono::Duration::minutes(5);
        assert_eq!(elapsed_between(a, b), Duration::from_secs(300));
        assert_eq!(elapsed_between(b, a), Duration::ZERO);
    }
}
