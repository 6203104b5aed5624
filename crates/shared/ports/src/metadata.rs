use async_trait::async_trait;
use bloom_core::NftMetadata;

use crate::error::MetadataResult;

/// Port for resolving a token URI into its metadata document
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    /// Fetch and parse the metadata document behind `token_uri`
    async fn fetch_metadata(&self, token_uri: &str) -> MetadataResult<NftMetadata>;

    /// Turn a content-addressed link (`ipfs://...`, bare CID) into something
    /// displayable; plain URLs are returned unchanged
    fn resolve_uri(&self, uri: &str) -> String {
        uri.to_string()
    }
}
