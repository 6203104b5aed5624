//! NFT read-model
//!
//! An NFT is the on-chain triple (token URI, owner, auction flag) plus the
//! metadata document the URI points at. Missing metadata never hides a
//! token; a failed chain read does.

use bloom_core::{Address, Nft, NftMetadata, TokenId};
use bloom_ports::{AuctionReader, MetadataFetcher, NftInfo};
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;

use crate::error::Result;

/// Tokens loaded at once when listing many NFTs
pub const DEFAULT_CONCURRENCY: usize = 8;

pub struct NftBook {
    reader: Arc<dyn AuctionReader>,
    metadata: Arc<dyn MetadataFetcher>,
    concurrency: usize,
}

impl NftBook {
    pub fn new(reader: Arc<dyn AuctionReader>, metadata: Arc<dyn MetadataFetcher>) -> Self {
        Self {
            reader,
            metadata,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn reader(&self) -> &Arc<dyn AuctionReader> {
        &self.reader
    }

    /// Load one token; `None` when its chain data cannot be read
    pub async fn load_nft(&self, token_id: TokenId) -> Option<Nft> {
        match self.reader.nft_info(token_id).await {
            Ok(info) => Some(self.assemble(token_id, info).await),
            Err(e) => {
                warn!("Error loading NFT {}: {}", token_id, e);
                None
            }
        }
    }

    /// Build an [`Nft`] from chain facts, fetching metadata best-effort
    pub async fn assemble(&self, token_id: TokenId, info: NftInfo) -> Nft {
        let metadata = match self.metadata.fetch_metadata(&info.token_uri).await {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                debug!("No metadata for token {}: {}", token_id, e);
                None
            }
        };

        Nft {
            token_id,
            owner: info.owner,
            image_url: self.image_url(&info.token_uri, metadata.as_ref()),
            token_uri: info.token_uri,
            is_in_auction: info.is_in_auction,
            metadata,
        }
    }

    /// Metadata image when present, otherwise the token URI; both resolved
    fn image_url(&self, token_uri: &str, metadata: Option<&NftMetadata>) -> String {
        let source = metadata.and_then(NftMetadata::image).unwrap_or(token_uri);
        self.metadata.resolve_uri(source)
    }

    /// Every minted token, `1..=totalSupply`, in id order
    pub async fn all_nfts(&self) -> Result<Vec<Nft>> {
        let total = self.reader.total_supply().await?;
        Ok(self.load_many(1..=total).await)
    }

    /// Tokens held by `owner`; nothing is fetched without an owner
    pub async fn my_nfts(&self, owner: Option<Address>) -> Result<Vec<Nft>> {
        let Some(owner) = owner else {
            return Ok(Vec::new());
        };
        let tokens = self.reader.nfts_by_owner(owner).await?;
        Ok(self.load_many(tokens).await)
    }

    /// Load tokens concurrently, preserving input order and dropping failures
    async fn load_many(&self, tokens: impl IntoIterator<Item = TokenId>) -> Vec<Nft> {
        stream::iter(tokens)
            .map(|token_id| self.load_nft(token_id))
            .buffered(self.concurrency)
            .filter_map(|nft| async move { nft })
            .collect()
            .await
    }
}
