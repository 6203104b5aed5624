use serde::{Deserialize, Serialize};
use std::fmt;

use super::auction::AuctionView;
use crate::values::UnixSeconds;

/// Remaining time at or below which a running auction counts as ending soon
pub const ENDING_SOON_SECS: u64 = 60 * 60;

/// Badge shown on an auction card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Active,
    EndingSoon,
    Ended,
    NoBids,
}

impl AuctionStatus {
    /// Derive the badge for `view` at time `now`
    ///
    /// Precedence: ended, then ending soon, then no bids, then active.
    pub fn of(view: &AuctionView, now: UnixSeconds) -> Self {
        if !view.active || view.ended || view.end_time <= now {
            return AuctionStatus::Ended;
        }
        if view.end_time - now <= ENDING_SOON_SECS {
            return AuctionStatus::EndingSoon;
        }
        if !view.has_bids() {
            return AuctionStatus::NoBids;
        }
        AuctionStatus::Active
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuctionStatus::Active => "Active",
            AuctionStatus::EndingSoon => "Ending Soon",
            AuctionStatus::Ended => "Ended",
            AuctionStatus::NoBids => "No Bids",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
