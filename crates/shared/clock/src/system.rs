use bloom_core::{Timestamp, UnixSeconds};
use bloom_ports::Clock;
use chrono::Utc;

/// Wall-clock time, used when talking to a live chain
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }

    /// Block timestamps are whole seconds; a pre-epoch host clock reads as 0
    fn unix_seconds(&self) -> UnixSeconds {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
