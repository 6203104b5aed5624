//! Auction tabs

use bloom_core::{Address, AuctionView, UnixSeconds};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which slice of the auction list to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuctionFilter {
    /// Running and before the end time
    #[default]
    Active,
    /// Settled, or no longer active
    Ended,
    /// Past the end time with nobody having called `endAuction`
    Settle,
    /// Listed by the viewer
    Mine,
    /// Viewer holds the highest bid
    Bids,
    All,
}

impl AuctionFilter {
    pub const TABS: [AuctionFilter; 6] = [
        AuctionFilter::Active,
        AuctionFilter::Ended,
        AuctionFilter::Settle,
        AuctionFilter::Mine,
        AuctionFilter::Bids,
        AuctionFilter::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AuctionFilter::Active => "Active",
            AuctionFilter::Ended => "Ended",
            AuctionFilter::Settle => "Awaiting Settlement",
            AuctionFilter::Mine => "My Auctions",
            AuctionFilter::Bids => "My Bids",
            AuctionFilter::All => "All",
        }
    }

    /// Whether `view` belongs on this tab. Viewer-specific tabs are empty
    /// without a viewer.
    pub fn matches(&self, view: &AuctionView, viewer: Option<&Address>, now: UnixSeconds) -> bool {
        match self {
            AuctionFilter::Active => view.is_live(now),
            AuctionFilter::Ended => view.is_closed(),
            AuctionFilter::Settle => view.awaiting_settlement(now),
            AuctionFilter::Mine => viewer.is_some_and(|v| view.is_seller(v)),
            AuctionFilter::Bids => viewer.is_some_and(|v| view.is_highest_bidder(v)),
            AuctionFilter::All => true,
        }
    }

    pub fn apply<'a>(
        &self,
        auctions: &'a [AuctionView],
        viewer: Option<&Address>,
        now: UnixSeconds,
    ) -> Vec<&'a AuctionView> {
        auctions
            .iter()
            .filter(|view| self.matches(view, viewer, now))
            .collect()
    }
}

impl fmt::Display for AuctionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AuctionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(AuctionFilter::Active),
            "ended" => Ok(AuctionFilter::Ended),
            "settle" | "settlement" => Ok(AuctionFilter::Settle),
            "mine" => Ok(AuctionFilter::Mine),
            "bids" => Ok(AuctionFilter::Bids),
            "all" => Ok(AuctionFilter::All),
            other => Err(format!(
                "Unknown filter '{}': expected active, ended, settle, mine, bids or all",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_core::{AuctionRecord, Wei};

    const NOW: u64 = 5_000;

    fn seller() -> Address {
        Address::repeat_byte(0x01)
    }

    fn bidder() -> Address {
        Address::repeat_byte(0x02)
    }

    fn view(token_id: u64, end_time: u64, active: bool, ended: bool, bid: bool) -> AuctionView {
        AuctionRecord {
            token_id,
            seller: seller(),
            starting_bid: Wei::from(10u64),
            highest_bid: if bid { Wei::from(20u64) } else { Wei::ZERO },
            highest_bidder: if bid { bidder() } else { Address::ZERO },
            start_time: 0,
            end_time,
            active,
            ended,
        }
        .to_view(NOW)
    }

    fn ids(filter: AuctionFilter, auctions: &[AuctionView], viewer: Option<&Address>) -> Vec<u64> {
        filter
            .apply(auctions, viewer, NOW)
            .iter()
            .map(|v| v.token_id)
            .collect()
    }

    fn sample() -> Vec<AuctionView> {
        vec![
            view(1, NOW + 100, true, false, true),
            view(2, NOW, true, false, false),
            view(3, NOW - 100, false, true, true),
            view(4, NOW + 100, false, false, false),
        ]
    }

    #[test]
    fn test_time_based_tabs() {
        let auctions = sample();
        assert_eq!(ids(AuctionFilter::Active, &auctions, None), vec![1]);
        assert_eq!(ids(AuctionFilter::Ended, &auctions, None), vec![3, 4]);
        assert_eq!(ids(AuctionFilter::Settle, &auctions, None), vec![2]);
        assert_eq!(ids(AuctionFilter::All, &auctions, None).len(), 4);
    }

    #[test]
    fn test_viewer_tabs() {
        let auctions = sample();
        assert_eq!(ids(AuctionFilter::Mine, &auctions, Some(&seller())).len(), 4);
        assert_eq!(ids(AuctionFilter::Bids, &auctions, Some(&bidder())), vec![1, 3]);
        assert!(ids(AuctionFilter::Mine, &auctions, None).is_empty());
        assert!(ids(AuctionFilter::Bids, &auctions, None).is_empty());
        // Zero address never "holds" an unbid auction
        assert!(ids(AuctionFilter::Bids, &auctions, Some(&Address::ZERO)).is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!("Settle".parse::<AuctionFilter>().unwrap(), AuctionFilter::Settle);
        assert_eq!("bids".parse::<AuctionFilter>().unwrap(), AuctionFilter::Bids);
        assert!("nope".parse::<AuctionFilter>().is_err());
    }
}
