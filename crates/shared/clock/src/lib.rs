//! Bloom Clock Infrastructure
//!
//! Time sources and the local auction countdown:
//!
//! - [`SystemClock`]: wall-clock time for production
//! - [`ManualClock`]: frozen time that only moves when told to, for tests
//!   and the simulated chain
//! - [`countdown`]: turns an on-chain end time into a ticking label
//!
//! ## Usage
//!
//! ```ignore
//! use bloom_clock::{ManualClock, countdown};
//!
//! let clock = ManualClock::at_unix(1_700_000_000);
//! clock.advance_secs(90);
//! let label = countdown::time_left_label(1_700_000_600, clock.unix_seconds());
//! assert_eq!(label, "in 9 minutes");
//! ```

pub mod countdown;
mod manual;
mod system;

pub use countdown::{humanize_secs, time_left_label};
pub use manual::ManualClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use bloom_ports::Clock;
