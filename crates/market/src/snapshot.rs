use bloom_core::{Address, AuctionView, Nft, Timestamp, UnixSeconds};
use serde::Serialize;

use crate::filter::AuctionFilter;

/// Latest known state of the marketplace, as published by the sync task
#[derive(Debug, Clone, Default, Serialize)]
pub struct MarketSnapshot {
    pub auctions: Vec<AuctionView>,
    pub my_nfts: Vec<Nft>,
    pub all_nfts: Vec<Nft>,
    /// A refresh is in flight
    pub loading: bool,
    /// Why the last refresh failed; previous lists are kept
    pub error: Option<String>,
    /// When the last refresh completed
    pub refreshed_at: Option<Timestamp>,
    /// Clock reading the countdowns were last computed against
    pub now: UnixSeconds,
}

impl MarketSnapshot {
    /// Recompute every countdown against `now` without touching the chain
    pub fn retick(&mut self, now: UnixSeconds) {
        self.now = now;
        for auction in &mut self.auctions {
            auction.refresh_countdown(now);
        }
    }

    pub fn filtered(&self, filter: AuctionFilter, viewer: Option<&Address>) -> Vec<&AuctionView> {
        filter.apply(&self.auctions, viewer, self.now)
    }

    pub fn active(&self) -> Vec<&AuctionView> {
        self.filtered(AuctionFilter::Active, None)
    }

    pub fn ended(&self) -> Vec<&AuctionView> {
        self.filtered(AuctionFilter::Ended, None)
    }

    pub fn awaiting_settlement(&self) -> Vec<&AuctionView> {
        self.filtered(AuctionFilter::Settle, None)
    }

    pub fn mine(&self, viewer: Option<&Address>) -> Vec<&AuctionView> {
        self.filtered(AuctionFilter::Mine, viewer)
    }

    pub fn bids(&self, viewer: Option<&Address>) -> Vec<&AuctionView> {
        self.filtered(AuctionFilter::Bids, viewer)
    }

    /// Count per tab, for the tab strip
    pub fn tab_counts(&self, viewer: Option<&Address>) -> Vec<(AuctionFilter, usize)> {
        AuctionFilter::TABS
            .iter()
            .map(|tab| (*tab, self.filtered(*tab, viewer).len()))
            .collect()
    }

    pub fn auction(&self, token_id: u64) -> Option<&AuctionView> {
        self.auctions.iter().find(|a| a.token_id == token_id)
    }
}
