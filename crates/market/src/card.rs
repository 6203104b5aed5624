//! Everything an auction card shows for one viewer at one instant

use bloom_clock::countdown;
use bloom_core::{Address, AuctionPermissions, AuctionStatus, AuctionView, UnixSeconds};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AuctionCard {
    pub auction: AuctionView,
    pub permissions: AuctionPermissions,
    /// `"Ended"` or `"in <distance>"`
    pub time_left: String,
    /// Lowest acceptable next bid, in ether
    pub min_bid: String,
}

impl AuctionCard {
    pub fn new(auction: AuctionView, viewer: Option<&Address>, now: UnixSeconds) -> Self {
        let permissions = AuctionPermissions::for_viewer(&auction, viewer, now);
        let time_left = countdown::time_left_label(auction.end_time, now);
        let min_bid = auction.min_bid();

        Self {
            auction,
            permissions,
            time_left,
            min_bid,
        }
    }

    pub fn status(&self) -> AuctionStatus {
        self.permissions.status
    }

    /// Why the viewer may not bid, if they may not
    pub fn bid_blocker(&self) -> Option<&'static str> {
        let p = &self.permissions;
        if p.can_bid {
            None
        } else if p.is_owner {
            Some("You cannot bid on your own auction")
        } else if !p.is_running {
            Some("Auction is not running")
        } else {
            Some("Connect an account to bid")
        }
    }

    pub fn end_blocker(&self) -> Option<&'static str> {
        let p = &self.permissions;
        if p.can_end {
            None
        } else if !self.auction.active {
            Some("Auction is not active")
        } else if p.is_running {
            Some("Auction has not reached its end time")
        } else {
            Some("Only the seller or the highest bidder can end this auction")
        }
    }

    pub fn cancel_blocker(&self) -> Option<&'static str> {
        let p = &self.permissions;
        if p.can_cancel {
            None
        } else if !p.is_owner {
            Some("Only the seller can cancel this auction")
        } else if !p.has_no_bids {
            Some("Cannot cancel an auction that has bids")
        } else {
            Some("Auction is not active")
        }
    }
}
