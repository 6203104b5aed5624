//! Content-addressed metadata resolution
//!
//! Token URIs are usually `ipfs://<cid>` links (or a bare CID). They are
//! rewritten onto an HTTP gateway and the JSON document fetched. Documents
//! behind a CID never change, so those fetches are cached; plain http(s)
//! URIs are fetched every time.

use async_trait::async_trait;
use bloom_core::NftMetadata;
use bloom_ports::{MetadataError, MetadataFetcher, MetadataResult};
use dashmap::DashMap;
use log::debug;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::GatewayError;

/// HTTP gateway in front of IPFS
pub struct IpfsGateway {
    client: Client,
    /// Gateway root, always ending in `/`
    base: Url,
    cache: DashMap<String, NftMetadata>,
}

impl IpfsGateway {
    pub fn new(gateway: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let mut base = Url::parse(gateway).map_err(|e| GatewayError::InvalidUrl {
            url: gateway.to_string(),
            reason: e.to_string(),
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base,
            cache: DashMap::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    /// Map a token URI onto a fetchable URL
    ///
    /// - `ipfs://<cid>[/path]` and `ipfs://ipfs/<cid>` -> `<gateway>/ipfs/<cid>[/path]`
    /// - `/ipfs/<cid>` -> `<gateway>/ipfs/<cid>`
    /// - bare CIDs (`Qm...`, `bafy...`) -> `<gateway>/ipfs/<cid>`
    /// - `http(s)://` URLs are used as-is
    pub fn resolve(&self, uri: &str) -> MetadataResult<String> {
        self.locate(uri).map(|target| target.url)
    }

    fn locate(&self, uri: &str) -> MetadataResult<Target> {
        let uri = uri.trim();

        let content_path = if let Some(rest) = uri.strip_prefix("ipfs://") {
            rest.strip_prefix("ipfs/").unwrap_or(rest)
        } else if let Some(rest) = uri.strip_prefix("/ipfs/") {
            rest
        } else if uri.starts_with("http://") || uri.starts_with("https://") {
            return Ok(Target {
                url: uri.to_string(),
                immutable: false,
            });
        } else if is_bare_cid(uri) {
            uri
        } else {
            return Err(MetadataError::UnsupportedUri(uri.to_string()));
        };

        if content_path.is_empty() {
            return Err(MetadataError::UnsupportedUri(uri.to_string()));
        }

        self.base
            .join(&format!("ipfs/{}", content_path))
            .map(|url| Target {
                url: url.into(),
                immutable: true,
            })
            .map_err(|_| MetadataError::UnsupportedUri(uri.to_string()))
    }

    /// Number of cached documents
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

/// Where a token URI is fetched from
struct Target {
    url: String,
    /// Content-addressed, so safe to cache
    immutable: bool,
}

/// CIDv0 (`Qm...`) or base32 CIDv1 (`bafy...`), optionally followed by a path
fn is_bare_cid(uri: &str) -> bool {
    let cid = uri.split('/').next().unwrap_or_default();
    (cid.starts_with("Qm") && cid.len() == 46) || (cid.starts_with("bafy") && cid.len() > 50)
}

#[async_trait]
impl MetadataFetcher for IpfsGateway {
    async fn fetch_metadata(&self, token_uri: &str) -> MetadataResult<NftMetadata> {
        let Target { url, immutable } = self.locate(token_uri)?;

        if immutable {
            if let Some(hit) = self.cache.get(&url) {
                return Ok(hit.clone());
            }
        }

        debug!("Fetching metadata {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| MetadataError::Fetch {
                uri: url.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MetadataError::Status {
                uri: url,
                status: status.as_u16(),
            });
        }

        let text = resp.text().await.map_err(|e| MetadataError::Fetch {
            uri: url.clone(),
            reason: e.to_string(),
        })?;
        let metadata: NftMetadata =
            serde_json::from_str(&text).map_err(|e| MetadataError::Parse {
                uri: url.clone(),
                reason: e.to_string(),
            })?;

        if immutable {
            self.cache.insert(url, metadata.clone());
        }
        Ok(metadata)
    }

    fn resolve_uri(&self, uri: &str) -> String {
        self.resolve(uri).unwrap_or_else(|_| uri.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CID_V0: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
    const CID_V1: &str = "bafybeigdyrzt5sfp7udm7hu76uh7y26nf3efuylqabf3oclgtqy55fbzdi";

    fn gateway() -> IpfsGateway {
        IpfsGateway::new("https://gateway.pinata.cloud", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_resolve_ipfs_scheme() {
        let gw = gateway();
        assert_eq!(
            gw.resolve(&format!("ipfs://{}", CID_V0)).unwrap(),
            format!("https://gateway.pinata.cloud/ipfs/{}", CID_V0)
        );
        assert_eq!(
            gw.resolve(&format!("ipfs://ipfs/{}/meta.json", CID_V0)).unwrap(),
            format!("https://gateway.pinata.cloud/ipfs/{}/meta.json", CID_V0)
        );
    }

    #[test]
    fn test_resolve_bare_cids() {
        let gw = gateway();
        assert_eq!(
            gw.resolve(CID_V1).unwrap(),
            format!("https://gateway.pinata.cloud/ipfs/{}", CID_V1)
        );
        assert_eq!(
            gw.resolve(&format!("/ipfs/{}", CID_V0)).unwrap(),
            format!("https://gateway.pinata.cloud/ipfs/{}", CID_V0)
        );
    }

    #[test]
    fn test_http_urls_pass_through() {
        let gw = gateway();
        let url = "https://example.com/token/1.json";
        assert_eq!(gw.resolve(url).unwrap(), url);
    }

    #[test]
    fn test_only_content_addressed_targets_are_immutable() {
        let gw = gateway();
        assert!(gw.locate(&format!("ipfs://{}", CID_V0)).unwrap().immutable);
        assert!(gw.locate(CID_V1).unwrap().immutable);
        assert!(!gw.locate("https://example.com/token/1.json").unwrap().immutable);
    }

    #[test]
    fn test_unsupported_uris() {
        let gw = gateway();
        assert!(matches!(gw.resolve("ftp://nope"), Err(MetadataError::UnsupportedUri(_))));
        assert!(matches!(gw.resolve("ipfs://"), Err(MetadataError::UnsupportedUri(_))));
        // Trait method falls back to the raw string
        assert_eq!(gw.resolve_uri("not-a-cid"), "not-a-cid");
    }

    #[test]
    fn test_gateway_with_path_prefix() {
        let gw = IpfsGateway::new("http://localhost:8080/proxy", Duration::from_secs(5)).unwrap();
        assert_eq!(gw.base_url(), "http://localhost:8080/proxy/");
        assert_eq!(
            gw.resolve(&format!("ipfs://{}", CID_V0)).unwrap(),
            format!("http://localhost:8080/proxy/ipfs/{}", CID_V0)
        );
    }

    #[test]
    fn test_invalid_gateway_url() {
        assert!(matches!(
            IpfsGateway::new("not a url", Duration::from_secs(1)),
            Err(GatewayError::InvalidUrl { .. })
        ));
    }
}
