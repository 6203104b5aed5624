use bloom_core::{Timestamp, UnixSeconds};
use bloom_ports::Clock;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Clock that only moves when explicitly advanced
///
/// Shared through an `Arc` so a test, the simulated chain and the read-models
/// all observe the same instant.
pub struct ManualClock {
    /// Current time in milliseconds since the unix epoch
    now_ms: AtomicI64,
}

impl ManualClock {
    /// Create a clock frozen at `initial_time` (or the current wall time)
    pub fn new(initial_time: Option<Timestamp>) -> Arc<Self> {
        let start = initial_time.unwrap_or_else(Utc::now);
        Arc::new(Self {
            now_ms: AtomicI64::new(start.timestamp_millis()),
        })
    }

    /// Create a clock frozen at a unix timestamp in seconds
    pub fn at_unix(secs: UnixSeconds) -> Arc<Self> {
        Arc::new(Self {
            now_ms: AtomicI64::new(secs as i64 * 1_000),
        })
    }

    /// Move time forward (or backward, for a negative duration)
    pub fn advance(&self, duration: Duration) {
        self.now_ms
            .fetch_add(duration.num_milliseconds(), Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::seconds(secs as i64));
    }

    /// Explicitly set the current time
    pub fn set_time(&self, time: Timestamp) {
        self.now_ms.store(time.timestamp_millis(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        DateTime::from_timestamp_millis(self.now_ms.load(Ordering::SeqCst)).unwrap_or_default()
    }

    fn name(&self) -> &str {
        "ManualClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_is_frozen() {
        let clock = ManualClock::new(None);
        let time1 = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert_eq!(clock.now(), time1);
    }

    #[test]
    fn test_advance_and_set() {
        let clock = ManualClock::at_unix(1_000);
        assert_eq!(clock.unix_seconds(), 1_000);

        clock.advance_secs(30);
        assert_eq!(clock.unix_seconds(), 1_030);

        clock.advance(Duration::milliseconds(-30_000));
        assert_eq!(clock.unix_seconds(), 1_000);

        let target = DateTime::from_timestamp(5_000, 0).unwrap();
        clock.set_time(target);
        assert_eq!(clock.now(), target);
    }
}
