use serde::{Deserialize, Serialize};

use super::nft::Nft;
use crate::units::{MIN_BID_INCREMENT, format_ether};
use crate::values::{Address, TokenId, UnixSeconds, Wei};

/// Auction struct as stored by the contract for one token
///
/// Amounts are raw wei. A token that was never auctioned (or whose auction
/// was cancelled) reads back with both `active` and `ended` false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuctionRecord {
    pub token_id: TokenId,
    pub seller: Address,
    pub starting_bid: Wei,
    pub highest_bid: Wei,
    /// Zero address until the first bid lands
    pub highest_bidder: Address,
    pub start_time: UnixSeconds,
    pub end_time: UnixSeconds,
    pub active: bool,
    pub ended: bool,
}

impl AuctionRecord {
    /// Whether the record belongs in the marketplace at all (running or settled)
    pub fn is_listed(&self) -> bool {
        self.active || self.ended
    }

    /// Whether anyone has bid yet
    pub fn has_bids(&self) -> bool {
        self.highest_bidder != Address::ZERO
    }

    /// Convert to the display read-model, computing the countdown against `now`
    pub fn to_view(&self, now: UnixSeconds) -> AuctionView {
        AuctionView {
            token_id: self.token_id,
            seller: self.seller,
            starting_bid: format_ether(self.starting_bid),
            highest_bid: format_ether(self.highest_bid),
            starting_bid_wei: self.starting_bid,
            highest_bid_wei: self.highest_bid,
            highest_bidder: self.highest_bidder,
            start_time: self.start_time,
            end_time: self.end_time,
            active: self.active,
            ended: self.ended,
            time_remaining: self.end_time.saturating_sub(now),
            nft: None,
        }
    }
}

/// Display-ready auction: ether strings, plain seconds, a countdown, and the
/// NFT being sold when it could be loaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuctionView {
    pub token_id: TokenId,
    pub seller: Address,
    /// Starting bid in ether, e.g. `"0.5"`
    pub starting_bid: String,
    /// Highest bid in ether; `"0.0"` until someone bids
    pub highest_bid: String,
    pub starting_bid_wei: Wei,
    pub highest_bid_wei: Wei,
    pub highest_bidder: Address,
    pub start_time: UnixSeconds,
    pub end_time: UnixSeconds,
    pub active: bool,
    pub ended: bool,
    /// Seconds left until `end_time`, never negative
    pub time_remaining: u64,
    pub nft: Option<Nft>,
}

impl AuctionView {
    /// Attach the NFT being auctioned
    pub fn with_nft(mut self, nft: Nft) -> Self {
        self.nft = Some(nft);
        self
    }

    /// Recompute the countdown against a newer `now`
    pub fn refresh_countdown(&mut self, now: UnixSeconds) {
        self.time_remaining = self.end_time.saturating_sub(now);
    }

    // === Partition predicates ===

    /// Running and not yet past its end time
    pub fn is_live(&self, now: UnixSeconds) -> bool {
        self.active && self.end_time > now
    }

    /// Settled on chain, or no longer active
    pub fn is_closed(&self) -> bool {
        self.ended || !self.active
    }

    /// Past its end time but nobody has called `endAuction` yet
    pub fn awaiting_settlement(&self, now: UnixSeconds) -> bool {
        self.active && self.end_time <= now
    }

    pub fn is_seller(&self, who: &Address) -> bool {
        self.seller == *who
    }

    pub fn is_highest_bidder(&self, who: &Address) -> bool {
        self.has_bids() && self.highest_bidder == *who
    }

    pub fn has_bids(&self) -> bool {
        self.highest_bidder != Address::ZERO
    }

    // === Bidding ===

    /// Lowest acceptable next bid in wei
    ///
    /// With no bids this is the starting bid; otherwise the highest bid plus
    /// [`MIN_BID_INCREMENT`].
    pub fn min_bid_wei(&self) -> Wei {
        if self.highest_bid_wei.is_zero() {
            self.starting_bid_wei
        } else {
            self.highest_bid_wei.saturating_add(MIN_BID_INCREMENT)
        }
    }

    /// Lowest acceptable next bid in ether
    pub fn min_bid(&self) -> String {
        format_ether(self.min_bid_wei())
    }

    // === Display helpers ===

    /// Metadata name, or `NFT #<id>` when metadata is unavailable
    pub fn display_name(&self) -> String {
        self.nft
            .as_ref()
            .map(|nft| nft.display_name())
            .unwrap_or_else(|| format!("NFT #{}", self.token_id))
    }
}
