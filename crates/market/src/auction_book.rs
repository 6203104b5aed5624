//! Auction read-model

use bloom_core::{AuctionRecord, AuctionView, TokenId};
use bloom_ports::{Clock, ContractResult, NftInfo};
use log::{info, warn};
use std::sync::Arc;

use crate::error::Result;
use crate::nft_book::NftBook;

/// Listed auctions, converted for display and joined with their NFTs
pub struct AuctionBook {
    nfts: Arc<NftBook>,
    clock: Arc<dyn Clock>,
}

impl AuctionBook {
    pub fn new(nfts: Arc<NftBook>, clock: Arc<dyn Clock>) -> Self {
        Self { nfts, clock }
    }

    pub fn nfts(&self) -> &Arc<NftBook> {
        &self.nfts
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Every auction that is running or settled, in token id order
    ///
    /// Tokens are walked one at a time; a token whose reads fail is logged
    /// and skipped. Only a failing `totalSupply` fails the whole fetch.
    pub async fn fetch_auctions(&self) -> Result<Vec<AuctionView>> {
        let total = self.nfts.reader().total_supply().await?;
        let mut auctions = Vec::new();

        for token_id in 1..=total {
            match self.load_listed(token_id).await {
                Ok(Some(view)) => auctions.push(view),
                Ok(None) => {}
                Err(e) => warn!("Error loading auction for token {}: {}", token_id, e),
            }
        }

        info!("Loaded {} auctions out of {} tokens", auctions.len(), total);
        Ok(auctions)
    }

    /// One token's auction, whether or not it is listed
    pub async fn load_auction(&self, token_id: TokenId) -> ContractResult<AuctionView> {
        let record = self.nfts.reader().get_auction(token_id).await?;
        self.to_display(record).await
    }

    async fn load_listed(&self, token_id: TokenId) -> ContractResult<Option<AuctionView>> {
        let record = self.nfts.reader().get_auction(token_id).await?;
        if !record.is_listed() {
            return Ok(None);
        }
        self.to_display(record).await.map(Some)
    }

    /// Convert and attach the NFT; the seller is shown as its owner
    ///
    /// The token must still be readable in full (`ownerOf` included), so a
    /// burned or broken token drops out of the listing.
    async fn to_display(&self, record: AuctionRecord) -> ContractResult<AuctionView> {
        let info = self.nfts.reader().nft_info(record.token_id).await?;

        let view = record.to_view(self.clock.unix_seconds());
        let nft = self
            .nfts
            .assemble(
                record.token_id,
                NftInfo {
                    owner: record.seller,
                    ..info
                },
            )
            .await;

        Ok(view.with_nft(nft))
    }
}
