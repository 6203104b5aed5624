use async_trait::async_trait;
use bloom_core::{Address, AuctionRecord, TokenId, Wei};

use crate::error::ContractResult;

/// Per-token facts needed to render an NFT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NftInfo {
    pub token_uri: String,
    pub owner: Address,
    pub is_in_auction: bool,
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    /// `0x`-prefixed transaction hash
    pub transaction_hash: String,
    pub block_number: Option<u64>,
}

/// Outcome of a mint: the receipt plus the new token id, when the
/// `NFTMinted` event was found in the logs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintReceipt {
    pub receipt: TxReceipt,
    pub token_id: Option<TokenId>,
}

/// Port for the read (view) side of the auction contract
#[async_trait]
pub trait AuctionReader: Send + Sync {
    /// Number of tokens minted so far; ids run `1..=total_supply`
    async fn total_supply(&self) -> ContractResult<u64>;

    /// Auction struct for a token (all-zero / inactive if never auctioned)
    async fn get_auction(&self, token_id: TokenId) -> ContractResult<AuctionRecord>;

    async fn token_uri(&self, token_id: TokenId) -> ContractResult<String>;

    async fn owner_of(&self, token_id: TokenId) -> ContractResult<Address>;

    async fn is_in_auction(&self, token_id: TokenId) -> ContractResult<bool>;

    async fn is_auction_active(&self, token_id: TokenId) -> ContractResult<bool>;

    /// Seconds left as computed by the contract against block time
    async fn time_remaining(&self, token_id: TokenId) -> ContractResult<u64>;

    async fn balance_of(&self, owner: Address) -> ContractResult<u64>;

    async fn token_of_owner_by_index(&self, owner: Address, index: u64)
    -> ContractResult<TokenId>;

    async fn token_by_index(&self, index: u64) -> ContractResult<TokenId>;

    /// Fixed fee (wei) that must accompany a mint
    async fn admin_fee(&self) -> ContractResult<Wei>;

    /// Percentage the contract keeps from a settled auction
    async fn admin_fee_percentage(&self) -> ContractResult<u64>;

    async fn accumulated_fees(&self) -> ContractResult<Wei>;

    /// Token URI, owner and auction flag for one token
    async fn nft_info(&self, token_id: TokenId) -> ContractResult<NftInfo> {
        let token_uri = self.token_uri(token_id).await?;
        let owner = self.owner_of(token_id).await?;
        let is_in_auction = self.is_in_auction(token_id).await?;

        Ok(NftInfo {
            token_uri,
            owner,
            is_in_auction,
        })
    }

    /// Token ids held by `owner`, in enumeration order
    async fn nfts_by_owner(&self, owner: Address) -> ContractResult<Vec<TokenId>> {
        let balance = self.balance_of(owner).await?;
        // Balance comes from the node; don't size an allocation by it
        let mut tokens = Vec::new();
        for index in 0..balance {
            tokens.push(self.token_of_owner_by_index(owner, index).await?);
        }
        Ok(tokens)
    }
}

/// Port for the write (transaction) side of the auction contract
///
/// Transactions are sent from [`AuctionWriter::account`]; signing is the
/// node's or wallet's business.
#[async_trait]
pub trait AuctionWriter: Send + Sync {
    /// The account transactions are sent from, if one is configured
    fn account(&self) -> Option<Address>;

    /// Mint a token pointing at `ipfs_hash`, paying `admin_fee`
    async fn mint(&self, ipfs_hash: &str, admin_fee: Wei) -> ContractResult<MintReceipt>;

    async fn create_auction(
        &self,
        token_id: TokenId,
        starting_bid: Wei,
        duration_secs: u64,
    ) -> ContractResult<TxReceipt>;

    /// Bid `amount` wei (sent as the transaction value)
    async fn bid(&self, token_id: TokenId, amount: Wei) -> ContractResult<TxReceipt>;

    async fn end_auction(&self, token_id: TokenId) -> ContractResult<TxReceipt>;

    async fn cancel_auction(&self, token_id: TokenId) -> ContractResult<TxReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::error::ContractError;

    // Ensure traits are object-safe
    fn _assert_reader_object_safe(_: &dyn AuctionReader) {}
    fn _assert_writer_object_safe(_: &dyn AuctionWriter) {}

    /// Reports an absurd balance but only holds two tokens
    struct LyingNode;

    #[async_trait]
    impl AuctionReader for LyingNode {
        async fn total_supply(&self) -> ContractResult<u64> {
            Ok(2)
        }
        async fn get_auction(&self, _: TokenId) -> ContractResult<AuctionRecord> {
            Err(ContractError::UnknownToken(0))
        }
        async fn token_uri(&self, token_id: TokenId) -> ContractResult<String> {
            Ok(format!("ipfs://Qm{}", token_id))
        }
        async fn owner_of(&self, _: TokenId) -> ContractResult<Address> {
            Ok(Address::repeat_byte(0x0a))
        }
        async fn is_in_auction(&self, _: TokenId) -> ContractResult<bool> {
            Ok(false)
        }
        async fn is_auction_active(&self, _: TokenId) -> ContractResult<bool> {
            Ok(false)
        }
        async fn time_remaining(&self, _: TokenId) -> ContractResult<u64> {
            Ok(0)
        }
        async fn balance_of(&self, _: Address) -> ContractResult<u64> {
            Ok(u64::MAX)
        }
        async fn token_of_owner_by_index(&self, _: Address, index: u64) -> ContractResult<TokenId> {
            if index < 2 {
                Ok(index + 1)
            } else {
                Err(ContractError::Reverted("owner index out of bounds".into()))
            }
        }
        async fn token_by_index(&self, index: u64) -> ContractResult<TokenId> {
            Ok(index + 1)
        }
        async fn admin_fee(&self) -> ContractResult<Wei> {
            Ok(Wei::ZERO)
        }
        async fn admin_fee_percentage(&self) -> ContractResult<u64> {
            Ok(0)
        }
        async fn accumulated_fees(&self) -> ContractResult<Wei> {
            Ok(Wei::ZERO)
        }
    }

    #[tokio::test]
    async fn test_nft_info_reads_all_three_fields() {
        let info = LyingNode.nft_info(7).await.unwrap();
        assert_eq!(info.token_uri, "ipfs://Qm7");
        assert_eq!(info.owner, Address::repeat_byte(0x0a));
        assert!(!info.is_in_auction);
    }

    #[tokio::test]
    async fn test_huge_reported_balance_is_not_preallocated() {
        let err = LyingNode
            .nfts_by_owner(Address::repeat_byte(0x0a))
            .await
            .unwrap_err();
        assert!(matches!(err, ContractError::Reverted(_)));
    }
}
