//! Metadata documents served from memory

use async_trait::async_trait;
use bloom_core::NftMetadata;
use bloom_ports::{MetadataError, MetadataFetcher, MetadataResult};
use dashmap::{DashMap, DashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

const SIM_GATEWAY: &str = "https://gateway.pinata.cloud";

/// [`MetadataFetcher`] backed by a map of token URI to document
///
/// Unknown URIs answer like a gateway 404; URIs marked with
/// [`StaticMetadata::fail`] answer like a dropped connection.
#[derive(Default)]
pub struct StaticMetadata {
    documents: DashMap<String, NftMetadata>,
    failing: DashSet<String>,
    fetches: AtomicUsize,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, token_uri: impl Into<String>, metadata: NftMetadata) {
        self.documents.insert(token_uri.into(), metadata);
    }

    pub fn fail(&self, token_uri: impl Into<String>) {
        self.failing.insert(token_uri.into());
    }

    /// Number of fetches attempted so far
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetadataFetcher for StaticMetadata {
    async fn fetch_metadata(&self, token_uri: &str) -> MetadataResult<NftMetadata> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(token_uri) {
            return Err(MetadataError::Fetch {
                uri: self.resolve_uri(token_uri),
                reason: "connection reset".to_string(),
            });
        }

        self.documents
            .get(token_uri)
            .map(|doc| doc.clone())
            .ok_or_else(|| MetadataError::Status {
                uri: self.resolve_uri(token_uri),
                status: 404,
            })
    }

    fn resolve_uri(&self, uri: &str) -> String {
        match uri.strip_prefix("ipfs://") {
            Some(cid) => format!("{}/ipfs/{}", SIM_GATEWAY, cid),
            None => uri.to_string(),
        }
    }
}
