use async_trait::async_trait;
use bloom_clock::ManualClock;
use bloom_core::{Address, AuctionRecord, TokenId, UnixSeconds, Wei};
use bloom_ports::{
    AuctionReader, AuctionWriter, Clock, ContractError, ContractResult, MintReceipt, TxReceipt,
};
use dashmap::DashSet;
use log::{debug, info};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::error::{Result, SimError};

/// Fee charged per mint unless configured otherwise (0.001 ETH)
pub const DEFAULT_ADMIN_FEE: Wei = Wei::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

/// Share of a settled auction kept by the contract, in percent
pub const DEFAULT_FEE_PERCENTAGE: u64 = 5;

#[derive(Debug, Clone)]
struct TokenState {
    owner: Address,
    uri: String,
    in_auction: bool,
}

#[derive(Debug, Default)]
struct ChainState {
    /// Token `n` lives at index `n - 1`
    tokens: Vec<TokenState>,
    /// Latest auction per token, zeroed when never auctioned
    auctions: Vec<AuctionRecord>,
    accumulated_fees: Wei,
    block_number: u64,
}

impl ChainState {
    fn token(&self, token_id: TokenId) -> Result<&TokenState> {
        token_index(token_id)
            .and_then(|i| self.tokens.get(i))
            .ok_or(SimError::TokenNotFound(token_id))
    }

    fn token_mut(&mut self, token_id: TokenId) -> Result<&mut TokenState> {
        token_index(token_id)
            .and_then(|i| self.tokens.get_mut(i))
            .ok_or(SimError::TokenNotFound(token_id))
    }

    fn auction(&self, token_id: TokenId) -> Result<&AuctionRecord> {
        token_index(token_id)
            .and_then(|i| self.auctions.get(i))
            .ok_or(SimError::TokenNotFound(token_id))
    }

    fn auction_mut(&mut self, token_id: TokenId) -> Result<&mut AuctionRecord> {
        token_index(token_id)
            .and_then(|i| self.auctions.get_mut(i))
            .ok_or(SimError::TokenNotFound(token_id))
    }

    /// Mine a block and produce its receipt
    fn receipt(&mut self) -> TxReceipt {
        self.block_number += 1;
        TxReceipt {
            transaction_hash: format!("0x{:064x}", self.block_number),
            block_number: Some(self.block_number),
        }
    }
}

fn token_index(token_id: TokenId) -> Option<usize> {
    token_id.checked_sub(1).map(|i| i as usize)
}

fn empty_auction(token_id: TokenId) -> AuctionRecord {
    AuctionRecord {
        token_id,
        seller: Address::ZERO,
        starting_bid: Wei::ZERO,
        highest_bid: Wei::ZERO,
        highest_bidder: Address::ZERO,
        start_time: 0,
        end_time: 0,
        active: false,
        ended: false,
    }
}

/// In-memory BloomNFT contract
pub struct SimulatedChain {
    clock: Arc<ManualClock>,
    admin_fee: Wei,
    fee_percentage: u64,
    state: RwLock<ChainState>,
    failing_tokens: DashSet<TokenId>,
    failing_owner_reads: DashSet<TokenId>,
    fail_supply: AtomicBool,
}

impl SimulatedChain {
    pub fn new(clock: Arc<ManualClock>) -> Arc<Self> {
        Self::with_fees(clock, DEFAULT_ADMIN_FEE, DEFAULT_FEE_PERCENTAGE)
    }

    pub fn with_fees(clock: Arc<ManualClock>, admin_fee: Wei, fee_percentage: u64) -> Arc<Self> {
        Arc::new(Self {
            clock,
            admin_fee,
            fee_percentage,
            state: RwLock::new(ChainState::default()),
            failing_tokens: DashSet::new(),
            failing_owner_reads: DashSet::new(),
            fail_supply: AtomicBool::new(false),
        })
    }

    pub fn clock(&self) -> &Arc<ManualClock> {
        &self.clock
    }

    /// Writer handle sending transactions from `account`
    pub fn as_account(self: &Arc<Self>, account: Address) -> SimAccount {
        SimAccount {
            chain: Arc::clone(self),
            account,
        }
    }

    fn now(&self) -> UnixSeconds {
        self.clock.unix_seconds()
    }

    // === Failure injection ===

    /// Make every read touching `token_id` fail with a transport error
    pub fn fail_token(&self, token_id: TokenId) {
        self.failing_tokens.insert(token_id);
    }

    /// Make only `ownerOf(token_id)` fail, as for a burned token
    pub fn fail_owner_of(&self, token_id: TokenId) {
        self.failing_owner_reads.insert(token_id);
    }

    /// Make `totalSupply` fail with a transport error
    pub fn fail_supply(&self, fail: bool) {
        self.fail_supply.store(fail, Ordering::SeqCst);
    }

    pub fn clear_failures(&self) {
        self.failing_tokens.clear();
        self.failing_owner_reads.clear();
        self.fail_supply.store(false, Ordering::SeqCst);
    }

    fn check_token(&self, token_id: TokenId) -> Result<()> {
        if self.failing_tokens.contains(&token_id) {
            return Err(SimError::Injected(format!("read of token {} failed", token_id)));
        }
        Ok(())
    }

    // === Contract rules ===

    pub async fn mint_from(&self, from: Address, ipfs_hash: &str, value: Wei) -> Result<TokenId> {
        if ipfs_hash.trim().is_empty() {
            return Err(SimError::EmptyHash);
        }
        if value < self.admin_fee {
            return Err(SimError::InsufficientFee {
                required: self.admin_fee,
            });
        }

        let mut state = self.state.write().await;
        state.tokens.push(TokenState {
            owner: from,
            uri: format!("ipfs://{}", ipfs_hash.trim()),
            in_auction: false,
        });
        let token_id = state.tokens.len() as TokenId;
        state.auctions.push(empty_auction(token_id));
        state.accumulated_fees += value;

        info!("Minted token {} to {}", token_id, from);
        Ok(token_id)
    }

    pub async fn create_auction_from(
        &self,
        from: Address,
        token_id: TokenId,
        starting_bid: Wei,
        duration_secs: u64,
    ) -> Result<AuctionRecord> {
        if starting_bid.is_zero() {
            return Err(SimError::InvalidStartingBid);
        }
        if duration_secs == 0 {
            return Err(SimError::InvalidDuration);
        }

        let now = self.now();
        let mut state = self.state.write().await;
        let token = state.token_mut(token_id)?;
        if token.owner != from {
            return Err(SimError::NotOwner(token_id));
        }
        if token.in_auction {
            return Err(SimError::AlreadyInAuction(token_id));
        }
        token.in_auction = true;

        let record = AuctionRecord {
            token_id,
            seller: from,
            starting_bid,
            highest_bid: Wei::ZERO,
            highest_bidder: Address::ZERO,
            start_time: now,
            end_time: now + duration_secs,
            active: true,
            ended: false,
        };
        *state.auction_mut(token_id)? = record.clone();

        info!(
            "Auction created for token {} ending at {}",
            token_id, record.end_time
        );
        Ok(record)
    }

    pub async fn bid_from(&self, from: Address, token_id: TokenId, value: Wei) -> Result<()> {
        let now = self.now();
        let mut state = self.state.write().await;
        let auction = state.auction_mut(token_id)?;

        if !auction.active {
            return Err(SimError::AuctionNotActive(token_id));
        }
        if now >= auction.end_time {
            return Err(SimError::AuctionExpired(token_id));
        }
        if auction.seller == from {
            return Err(SimError::SellerCannotBid);
        }

        if auction.has_bids() {
            if value <= auction.highest_bid {
                return Err(SimError::BidTooLow {
                    min: auction.highest_bid + Wei::from(1),
                });
            }
        } else if value < auction.starting_bid {
            return Err(SimError::BidTooLow {
                min: auction.starting_bid,
            });
        }

        auction.highest_bid = value;
        auction.highest_bidder = from;
        debug!("Bid {} on token {} by {}", value, token_id, from);
        Ok(())
    }

    /// Settle an auction past its end time; the winner receives the token
    pub async fn end_auction_from(&self, from: Address, token_id: TokenId) -> Result<()> {
        let now = self.now();
        let mut state = self.state.write().await;
        let auction = state.auction_mut(token_id)?;

        if !auction.active {
            return Err(SimError::AuctionNotActive(token_id));
        }
        if now < auction.end_time {
            return Err(SimError::AuctionNotOver(token_id));
        }

        auction.active = false;
        auction.ended = true;
        let winner = auction.has_bids().then_some(auction.highest_bidder);
        let fee = auction.highest_bid * Wei::from(self.fee_percentage) / Wei::from(100);

        state.accumulated_fees += fee;
        let token = state.token_mut(token_id)?;
        token.in_auction = false;
        if let Some(winner) = winner {
            token.owner = winner;
        }

        info!(
            "Auction for token {} settled by {}, winner {:?}",
            token_id, from, winner
        );
        Ok(())
    }

    /// Withdraw an auction nobody has bid on
    pub async fn cancel_auction_from(&self, from: Address, token_id: TokenId) -> Result<()> {
        let mut state = self.state.write().await;
        let auction = state.auction_mut(token_id)?;

        if auction.seller != from {
            return Err(SimError::NotOwner(token_id));
        }
        if !auction.active {
            return Err(SimError::AuctionNotActive(token_id));
        }
        if auction.has_bids() {
            return Err(SimError::HasBids);
        }

        auction.active = false;
        auction.ended = false;
        state.token_mut(token_id)?.in_auction = false;

        info!("Auction for token {} cancelled", token_id);
        Ok(())
    }

    async fn mined(&self) -> TxReceipt {
        self.state.write().await.receipt()
    }
}

#[async_trait]
impl AuctionReader for SimulatedChain {
    async fn total_supply(&self) -> ContractResult<u64> {
        if self.fail_supply.load(Ordering::SeqCst) {
            return Err(SimError::Injected("totalSupply failed".into()).into());
        }
        Ok(self.state.read().await.tokens.len() as u64)
    }

    async fn get_auction(&self, token_id: TokenId) -> ContractResult<AuctionRecord> {
        self.check_token(token_id)?;
        Ok(self.state.read().await.auction(token_id)?.clone())
    }

    async fn token_uri(&self, token_id: TokenId) -> ContractResult<String> {
        self.check_token(token_id)?;
        Ok(self.state.read().await.token(token_id)?.uri.clone())
    }

    async fn owner_of(&self, token_id: TokenId) -> ContractResult<Address> {
        self.check_token(token_id)?;
        if self.failing_owner_reads.contains(&token_id) {
            return Err(SimError::Injected(format!("ownerOf({}) failed", token_id)).into());
        }
        Ok(self.state.read().await.token(token_id)?.owner)
    }

    async fn is_in_auction(&self, token_id: TokenId) -> ContractResult<bool> {
        self.check_token(token_id)?;
        Ok(self.state.read().await.token(token_id)?.in_auction)
    }

    async fn is_auction_active(&self, token_id: TokenId) -> ContractResult<bool> {
        let now = self.now();
        let record = self.get_auction(token_id).await?;
        Ok(record.active && now < record.end_time)
    }

    async fn time_remaining(&self, token_id: TokenId) -> ContractResult<u64> {
        let now = self.now();
        let record = self.get_auction(token_id).await?;
        if !record.active {
            return Ok(0);
        }
        Ok(record.end_time.saturating_sub(now))
    }

    async fn balance_of(&self, owner: Address) -> ContractResult<u64> {
        let state = self.state.read().await;
        Ok(state.tokens.iter().filter(|t| t.owner == owner).count() as u64)
    }

    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: u64,
    ) -> ContractResult<TokenId> {
        let state = self.state.read().await;
        state
            .tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.owner == owner)
            .nth(index as usize)
            .map(|(i, _)| i as TokenId + 1)
            .ok_or_else(|| {
                ContractError::Reverted(format!("owner index {} out of bounds", index))
            })
    }

    async fn token_by_index(&self, index: u64) -> ContractResult<TokenId> {
        let supply = self.state.read().await.tokens.len() as u64;
        if index >= supply {
            return Err(ContractError::Reverted(format!(
                "global index {} out of bounds",
                index
            )));
        }
        Ok(index + 1)
    }

    async fn admin_fee(&self) -> ContractResult<Wei> {
        Ok(self.admin_fee)
    }

    async fn admin_fee_percentage(&self) -> ContractResult<u64> {
        Ok(self.fee_percentage)
    }

    async fn accumulated_fees(&self) -> ContractResult<Wei> {
        Ok(self.state.read().await.accumulated_fees)
    }
}

/// The simulated chain seen through one sender account
#[derive(Clone)]
pub struct SimAccount {
    chain: Arc<SimulatedChain>,
    account: Address,
}

impl SimAccount {
    pub fn chain(&self) -> &Arc<SimulatedChain> {
        &self.chain
    }
}

#[async_trait]
impl AuctionWriter for SimAccount {
    fn account(&self) -> Option<Address> {
        Some(self.account)
    }

    async fn mint(&self, ipfs_hash: &str, admin_fee: Wei) -> ContractResult<MintReceipt> {
        let token_id = self.chain.mint_from(self.account, ipfs_hash, admin_fee).await?;
        Ok(MintReceipt {
            receipt: self.chain.mined().await,
            token_id: Some(token_id),
        })
    }

    async fn create_auction(
        &self,
        token_id: TokenId,
        starting_bid: Wei,
        duration_secs: u64,
    ) -> ContractResult<TxReceipt> {
        self.chain
            .create_auction_from(self.account, token_id, starting_bid, duration_secs)
            .await?;
        Ok(self.chain.mined().await)
    }

    async fn bid(&self, token_id: TokenId, amount: Wei) -> ContractResult<TxReceipt> {
        self.chain.bid_from(self.account, token_id, amount).await?;
        Ok(self.chain.mined().await)
    }

    async fn end_auction(&self, token_id: TokenId) -> ContractResult<TxReceipt> {
        self.chain.end_auction_from(self.account, token_id).await?;
        Ok(self.chain.mined().await)
    }

    async fn cancel_auction(&self, token_id: TokenId) -> ContractResult<TxReceipt> {
        self.chain.cancel_auction_from(self.account, token_id).await?;
        Ok(self.chain.mined().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Address {
        Address::repeat_byte(0xa1)
    }

    fn chain() -> Arc<SimulatedChain> {
        SimulatedChain::new(ManualClock::at_unix(1_000))
    }

    #[tokio::test]
    async fn test_token_ids_start_at_one() {
        let chain = chain();
        assert_eq!(chain.total_supply().await.unwrap(), 0);

        let id = chain.mint_from(alice(), "QmA", DEFAULT_ADMIN_FEE).await.unwrap();
        assert_eq!(id, 1);
        assert_eq!(chain.token_uri(1).await.unwrap(), "ipfs://QmA");
        assert_eq!(chain.token_by_index(0).await.unwrap(), 1);
        assert!(chain.token_by_index(1).await.is_err());
    }

    #[tokio::test]
    async fn test_never_auctioned_token_reads_zeroed() {
        let chain = chain();
        chain.mint_from(alice(), "QmA", DEFAULT_ADMIN_FEE).await.unwrap();

        let record = chain.get_auction(1).await.unwrap();
        assert!(!record.is_listed());
        assert_eq!(record.seller, Address::ZERO);
        assert_eq!(chain.time_remaining(1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let chain = chain();
        assert_eq!(
            chain.get_auction(0).await.unwrap_err(),
            ContractError::UnknownToken(0)
        );
        assert_eq!(
            chain.owner_of(9).await.unwrap_err(),
            ContractError::UnknownToken(9)
        );
    }

    #[tokio::test]
    async fn test_receipts_advance_blocks() {
        let chain = chain();
        let writer = chain.as_account(alice());

        let first = writer.mint("QmA", DEFAULT_ADMIN_FEE).await.unwrap();
        let second = writer.mint("QmB", DEFAULT_ADMIN_FEE).await.unwrap();

        assert_eq!(first.token_id, Some(1));
        assert_eq!(second.receipt.block_number, Some(2));
        assert_ne!(first.receipt.transaction_hash, second.receipt.transaction_hash);
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let chain = chain();
        chain.mint_from(alice(), "QmA", DEFAULT_ADMIN_FEE).await.unwrap();

        chain.fail_token(1);
        chain.fail_supply(true);
        assert!(matches!(chain.get_auction(1).await, Err(ContractError::Transport(_))));
        assert!(matches!(chain.total_supply().await, Err(ContractError::Transport(_))));

        chain.clear_failures();
        chain.fail_owner_of(1);
        assert!(matches!(chain.owner_of(1).await, Err(ContractError::Transport(_))));
        assert!(chain.token_uri(1).await.is_ok());

        chain.clear_failures();
        assert!(chain.owner_of(1).await.is_ok());
        assert!(chain.get_auction(1).await.is_ok());
        assert_eq!(chain.total_supply().await.unwrap(), 1);
    }
}
