use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Auction length in seconds, as passed to `createAuction`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuctionDuration(u64);

impl AuctionDuration {
    pub const THREE_MINUTES: Self = Self(180);
    pub const ONE_HOUR: Self = Self(3_600);
    pub const SIX_HOURS: Self = Self(21_600);
    pub const TWELVE_HOURS: Self = Self(43_200);
    pub const ONE_DAY: Self = Self(86_400);
    pub const THREE_DAYS: Self = Self(259_200);
    pub const SEVEN_DAYS: Self = Self(604_800);

    /// Durations offered when creating an auction, shortest first
    pub const PRESETS: [(&'static str, Self); 7] = [
        ("3 Minutes", Self::THREE_MINUTES),
        ("1 Hour", Self::ONE_HOUR),
        ("6 Hours", Self::SIX_HOURS),
        ("12 Hours", Self::TWELVE_HOURS),
        ("1 Day", Self::ONE_DAY),
        ("3 Days", Self::THREE_DAYS),
        ("7 Days", Self::SEVEN_DAYS),
    ];

    /// Any positive number of seconds
    pub fn from_secs(secs: u64) -> Option<Self> {
        (secs > 0).then_some(Self(secs))
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Preset label, if this duration is one of the presets
    pub fn label(&self) -> Option<&'static str> {
        Self::PRESETS
            .iter()
            .find(|(_, d)| d == self)
            .map(|(label, _)| *label)
    }
}

impl Default for AuctionDuration {
    fn default() -> Self {
        Self::ONE_DAY
    }
}

impl fmt::Display for AuctionDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label() {
            Some(label) => f.write_str(label),
            None => write!(f, "{}s", self.0),
        }
    }
}

/// Accepts plain seconds (`"3600"`) or a unit suffix: `"3m"`, `"1h"`, `"7d"`
impl FromStr for AuctionDuration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (digits, multiplier) = match s.char_indices().last() {
            Some((i, 's')) => (&s[..i], 1),
            Some((i, 'm')) => (&s[..i], 60),
            Some((i, 'h')) => (&s[..i], 3_600),
            Some((i, 'd')) => (&s[..i], 86_400),
            _ => (s, 1),
        };

        let value: u64 = digits
            .parse()
            .map_err(|_| format!("Invalid duration: {}", s))?;

        value
            .checked_mul(multiplier)
            .and_then(Self::from_secs)
            .ok_or_else(|| format!("Duration must be positive: {}", s))
    }
}
