//! Marketplace actions
//!
//! Each action is checked locally first (inputs, then the same card rules
//! the front end shows) so obvious mistakes never cost a transaction. On
//! success the sync cache, if attached, is refreshed before returning.

use bloom_core::units::decimal_to_wei;
use bloom_core::{Address, TokenId};
use bloom_ports::{AuctionReader, AuctionWriter, MintReceipt, TxReceipt};
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::auction_book::AuctionBook;
use crate::card::AuctionCard;
use crate::error::{ActionError, ActionResult};
use crate::sync::SyncHandle;

pub struct Marketplace {
    writer: Arc<dyn AuctionWriter>,
    auctions: Arc<AuctionBook>,
    sync: Option<SyncHandle>,
}

impl Marketplace {
    pub fn new(writer: Arc<dyn AuctionWriter>, auctions: Arc<AuctionBook>) -> Self {
        Self {
            writer,
            auctions,
            sync: None,
        }
    }

    /// Refresh this sync cache after every successful action
    pub fn with_sync(mut self, sync: SyncHandle) -> Self {
        self.sync = Some(sync);
        self
    }

    /// The connected account, if any
    pub fn viewer(&self) -> Option<Address> {
        self.writer.account()
    }

    fn reader(&self) -> &Arc<dyn AuctionReader> {
        self.auctions.nfts().reader()
    }

    fn require_account(&self) -> ActionResult<Address> {
        self.viewer().ok_or(ActionError::NoAccount)
    }

    /// Card for a listed auction as the connected account sees it now
    pub async fn card(&self, token_id: TokenId) -> ActionResult<AuctionCard> {
        let view = self.auctions.load_auction(token_id).await?;
        if !(view.active || view.ended) {
            return Err(ActionError::NotListed(token_id));
        }
        let now = self.auctions.clock().unix_seconds();
        Ok(AuctionCard::new(view, self.viewer().as_ref(), now))
    }

    /// Mint a token for `ipfs_hash`, paying the contract's admin fee
    pub async fn mint(&self, ipfs_hash: &str) -> ActionResult<MintReceipt> {
        let ipfs_hash = ipfs_hash.trim();
        if ipfs_hash.is_empty() {
            return Err(ActionError::EmptyIpfsHash);
        }
        self.require_account()?;

        let fee = self.reader().admin_fee().await?;
        let minted = self.writer.mint(ipfs_hash, fee).await?;
        info!(
            "Minted token {:?} in {}",
            minted.token_id, minted.receipt.transaction_hash
        );

        self.after_success().await;
        Ok(minted)
    }

    /// List an owned token for `duration_secs` starting at `starting_bid` ETH
    pub async fn create_auction(
        &self,
        token_id: TokenId,
        starting_bid: Decimal,
        duration_secs: u64,
    ) -> ActionResult<TxReceipt> {
        let starting_bid = decimal_to_wei(starting_bid)?;
        if starting_bid.is_zero() {
            return Err(ActionError::ZeroStartingBid);
        }
        if duration_secs == 0 {
            return Err(ActionError::ZeroDuration);
        }
        let account = self.require_account()?;

        let reader = self.reader();
        if reader.owner_of(token_id).await? != account {
            return Err(ActionError::NotAllowed(format!(
                "You do not own token {}",
                token_id
            )));
        }
        if reader.is_in_auction(token_id).await? {
            return Err(ActionError::NotAllowed(format!(
                "Token {} is already in an auction",
                token_id
            )));
        }

        let receipt = self
            .writer
            .create_auction(token_id, starting_bid, duration_secs)
            .await?;
        info!("Listed token {} for {}s", token_id, duration_secs);

        self.after_success().await;
        Ok(receipt)
    }

    /// Bid `amount` ETH; must be at least the card's minimum bid
    pub async fn bid(&self, token_id: TokenId, amount: Decimal) -> ActionResult<TxReceipt> {
        let amount = decimal_to_wei(amount)?;
        self.require_account()?;

        let card = self.card(token_id).await?;
        if let Some(reason) = card.bid_blocker() {
            return Err(ActionError::NotAllowed(reason.to_string()));
        }
        if amount < card.auction.min_bid_wei() {
            return Err(ActionError::BidTooLow { min: card.min_bid });
        }

        let receipt = self.writer.bid(token_id, amount).await?;
        info!("Bid placed on token {}", token_id);

        self.after_success().await;
        Ok(receipt)
    }

    /// Settle an auction past its end time
    pub async fn end_auction(&self, token_id: TokenId) -> ActionResult<TxReceipt> {
        self.require_account()?;

        let card = self.card(token_id).await?;
        if let Some(reason) = card.end_blocker() {
            return Err(ActionError::NotAllowed(reason.to_string()));
        }

        let receipt = self.writer.end_auction(token_id).await?;
        info!("Ended auction for token {}", token_id);

        self.after_success().await;
        Ok(receipt)
    }

    /// Withdraw a listing nobody has bid on
    pub async fn cancel_auction(&self, token_id: TokenId) -> ActionResult<TxReceipt> {
        self.require_account()?;

        let card = self.card(token_id).await?;
        if let Some(reason) = card.cancel_blocker() {
            return Err(ActionError::NotAllowed(reason.to_string()));
        }

        let receipt = self.writer.cancel_auction(token_id).await?;
        info!("Cancelled auction for token {}", token_id);

        self.after_success().await;
        Ok(receipt)
    }

    async fn after_success(&self) {
        if let Some(sync) = &self.sync {
            if let Err(e) = sync.refresh().await {
                warn!("Post-action refresh failed: {}", e);
            }
        }
    }
}
