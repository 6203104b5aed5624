use serde::{Deserialize, Serialize};

use super::auction::AuctionView;
use super::status::AuctionStatus;
use crate::values::{Address, UnixSeconds};

/// What a given viewer may do with an auction card at a given moment
///
/// These are client-side gates only; the contract re-checks every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionPermissions {
    pub status: AuctionStatus,
    pub is_owner: bool,
    pub is_highest_bidder: bool,
    pub has_no_bids: bool,
    /// Running and before its end time, as seen by the local clock
    pub is_running: bool,
    pub can_bid: bool,
    pub can_end: bool,
    pub can_cancel: bool,
}

impl AuctionPermissions {
    pub fn for_viewer(view: &AuctionView, viewer: Option<&Address>, now: UnixSeconds) -> Self {
        let is_owner = viewer.is_some_and(|v| view.is_seller(v));
        let is_highest_bidder = viewer.is_some_and(|v| view.is_highest_bidder(v));
        let has_no_bids = !view.has_bids();
        let is_running = view.is_live(now);
        let past_end = view.awaiting_settlement(now);

        Self {
            status: AuctionStatus::of(view, now),
            is_owner,
            is_highest_bidder,
            has_no_bids,
            is_running,
            can_bid: viewer.is_some() && is_running && !is_owner,
            // Settling is offered to the two parties with a stake in the outcome
            can_end: past_end && (is_owner || is_highest_bidder),
            can_cancel: is_owner && has_no_bids && view.active,
        }
    }

    /// Viewer is currently winning a running auction
    pub fn is_leading(&self) -> bool {
        self.is_highest_bidder && self.is_running
    }
}
