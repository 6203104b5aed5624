use bloom_core::{Timestamp, UnixSeconds};

/// Port for time abstraction
///
/// This allows the read-models to use different time sources:
/// - Real system time for production
/// - Manually advanced time for deterministic tests
pub trait Clock: Send + Sync {
    /// Get the current time according to this clock
    fn now(&self) -> Timestamp;

    /// Current time in whole unix seconds, the resolution the contract uses
    fn unix_seconds(&self) -> UnixSeconds {
        self.now().timestamp().max(0) as UnixSeconds
    }

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
