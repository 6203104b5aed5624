//! Plain-text rendering of grids and cards

use bloom_clock::countdown;
use bloom_core::{Address, AuctionStatus, AuctionView, Nft, UnixSeconds};
use bloom_gateway::network::short_address;
use bloom_market::{AuctionCard, AuctionFilter, MarketSnapshot};
use bloom_ports::{MintReceipt, TxReceipt};
use std::fmt::Write;

fn badge(status: AuctionStatus) -> String {
    format!("[{}]", status.label())
}

/// `Active (3) | Ended (1) | ...` with the selected tab bracketed
pub fn tab_strip(counts: &[(AuctionFilter, usize)], selected: AuctionFilter) -> String {
    counts
        .iter()
        .map(|(tab, count)| {
            if *tab == selected {
                format!("[{} ({})]", tab.label(), count)
            } else {
                format!("{} ({})", tab.label(), count)
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

pub fn nft_grid(title: &str, nfts: &[Nft], empty: &str) -> String {
    let mut out = format!("{} ({})\n", title, nfts.len());
    if nfts.is_empty() {
        let _ = writeln!(out, "  {}", empty);
        return out;
    }

    for nft in nfts {
        let _ = writeln!(
            out,
            "  #{:<4} {:<24} owner {}{}",
            nft.token_id,
            nft.display_name(),
            short_address(&nft.owner),
            if nft.is_in_auction { "  [In Auction]" } else { "" }
        );
        let _ = writeln!(out, "        {}", nft.description());
        let _ = writeln!(out, "        {}", nft.image_url);
    }
    out
}

pub fn auction_grid(auctions: &[&AuctionView], now: UnixSeconds, empty: &str) -> String {
    if auctions.is_empty() {
        return format!("  {}\n", empty);
    }

    let mut out = String::new();
    for view in auctions {
        let status = AuctionStatus::of(view, now);
        let (label, amount) = if view.has_bids() {
            ("Highest", &view.highest_bid)
        } else {
            ("Starting", &view.starting_bid)
        };
        let _ = writeln!(
            out,
            "  #{:<4} {:<24} {:<14} {} {} ETH  {}",
            view.token_id,
            view.display_name(),
            badge(status),
            label,
            amount,
            countdown::time_left_label(view.end_time, now)
        );
    }
    out
}

pub fn auction_card(card: &AuctionCard) -> String {
    let view = &card.auction;
    let p = &card.permissions;
    let mut out = String::new();

    let _ = writeln!(out, "{} (token #{}) {}", view.display_name(), view.token_id, badge(p.status));
    if let Some(nft) = &view.nft {
        let _ = writeln!(out, "  {}", nft.description());
        let _ = writeln!(out, "  Image:    {}", nft.image_url);
        if let Some(metadata) = &nft.metadata {
            for attribute in &metadata.attributes {
                let _ = writeln!(out, "  {}: {}", attribute.trait_type, attribute.value);
            }
        }
    }
    let _ = writeln!(out, "  Seller:   {}{}", short_address(&view.seller), if p.is_owner { " (you)" } else { "" });
    let _ = writeln!(out, "  Starting: {} ETH", view.starting_bid);
    if view.has_bids() {
        let _ = writeln!(
            out,
            "  Highest:  {} ETH by {}{}",
            view.highest_bid,
            short_address(&view.highest_bidder),
            if p.is_highest_bidder { " (you)" } else { "" }
        );
    } else {
        let _ = writeln!(out, "  Highest:  no bids yet");
    }
    let _ = writeln!(out, "  Time:     {}", card.time_left);
    let _ = writeln!(out, "  Min bid:  {} ETH", card.min_bid);

    if p.is_leading() {
        let _ = writeln!(out, "  You are the highest bidder");
    }

    let actions: Vec<&str> = [
        (p.can_bid, "bid"),
        (p.can_end, "end"),
        (p.can_cancel, "cancel"),
    ]
    .iter()
    .filter(|(allowed, _)| *allowed)
    .map(|(_, name)| *name)
    .collect();
    let _ = writeln!(
        out,
        "  Actions:  {}",
        if actions.is_empty() { "none".to_string() } else { actions.join(", ") }
    );
    out
}

/// Counts, freshness and error line printed on each `watch` update
pub fn snapshot_summary(snapshot: &MarketSnapshot, viewer: Option<&Address>, selected: AuctionFilter) -> String {
    let mut out = tab_strip(&snapshot.tab_counts(viewer), selected);
    let _ = write!(
        out,
        "\n  My NFTs: {}  All NFTs: {}",
        snapshot.my_nfts.len(),
        snapshot.all_nfts.len()
    );
    if let Some(at) = snapshot.refreshed_at {
        let _ = write!(out, "  (refreshed {})", at.format("%H:%M:%S"));
    }
    if let Some(error) = &snapshot.error {
        let _ = write!(out, "\n  Error: {}", error);
    }
    out.push('\n');
    out
}

pub fn receipt(action: &str, receipt: &TxReceipt) -> String {
    match receipt.block_number {
        Some(block) => format!("{} confirmed in block {}: {}", action, block, receipt.transaction_hash),
        None => format!("{} sent: {}", action, receipt.transaction_hash),
    }
}

pub fn mint_receipt(minted: &MintReceipt) -> String {
    let line = receipt("Mint", &minted.receipt);
    match minted.token_id {
        Some(id) => format!("{}\nMinted token #{}", line, id),
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bloom_core::{AuctionRecord, Wei};

    const NOW: u64 = 1_000_000;

    fn view(with_bid: bool) -> AuctionView {
        AuctionRecord {
            token_id: 3,
            seller: Address::repeat_byte(0x11),
            starting_bid: Wei::from(500_000_000_000_000_000u64),
            highest_bid: if with_bid { Wei::from(750_000_000_000_000_000u64) } else { Wei::ZERO },
            highest_bidder: if with_bid { Address::repeat_byte(0x22) } else { Address::ZERO },
            start_time: NOW - 100,
            end_time: NOW + 300,
            active: true,
            ended: false,
        }
        .to_view(NOW)
    }

    #[test]
    fn test_tab_strip_marks_selection() {
        let strip = tab_strip(
            &[(AuctionFilter::Active, 2), (AuctionFilter::Ended, 0)],
            AuctionFilter::Ended,
        );
        assert_eq!(strip, "Active (2) | [Ended (0)]");
    }

    #[test]
    fn test_auction_grid_rows() {
        let no_bids = view(false);
        let bid = view(true);
        let grid = auction_grid(&[&no_bids, &bid], NOW, "none");

        let lines: Vec<_> = grid.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Starting 0.5 ETH"));
        assert!(lines[0].contains("in 5 minutes"));
        assert!(lines[1].contains("Highest 0.75 ETH"));
        assert_eq!(auction_grid(&[], NOW, "No active auctions"), "  No active auctions\n");
    }

    #[test]
    fn test_card_lists_allowed_actions() {
        let bidder = Address::repeat_byte(0x22);
        let card = AuctionCard::new(view(true), Some(&bidder), NOW);
        let text = auction_card(&card);

        assert!(text.contains("NFT #3"));
        assert!(text.contains("Min bid:  0.751 ETH"));
        assert!(text.contains("(you)"));
        assert!(text.contains("You are the highest bidder"));
        assert!(text.contains("Actions:  bid"));
    }

    #[test]
    fn test_receipts() {
        let tx = TxReceipt {
            transaction_hash: "0xabc".into(),
            block_number: Some(7),
        };
        assert_eq!(receipt("Bid", &tx), "Bid confirmed in block 7: 0xabc");

        let minted = MintReceipt {
            receipt: tx,
            token_id: Some(4),
        };
        assert!(mint_receipt(&minted).ends_with("Minted token #4"));
    }
}
