//! Gateway configuration

use bloom_core::Address;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public IPFS gateway used when none is configured
pub const DEFAULT_IPFS_GATEWAY: &str = "https://gateway.pinata.cloud";

/// Local development node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Where the contract lives and how to talk to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// JSON-RPC endpoint
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    /// Auction contract address (required for any contract access)
    #[serde(default)]
    pub contract_address: Option<Address>,

    /// Account transactions are sent from; reads work without one
    #[serde(default)]
    pub account: Option<Address>,

    /// HTTP gateway used to resolve `ipfs://` links
    #[serde(default = "default_ipfs_gateway")]
    pub ipfs_gateway: String,

    /// Per-request HTTP timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Delay between receipt polls after sending a transaction
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,

    /// Give up waiting for a receipt after this long
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_ipfs_gateway() -> String {
    DEFAULT_IPFS_GATEWAY.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_receipt_poll_ms() -> u64 {
    1_000
}

fn default_receipt_timeout_secs() -> u64 {
    120
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            contract_address: None,
            account: None,
            ipfs_gateway: default_ipfs_gateway(),
            request_timeout_secs: default_request_timeout_secs(),
            receipt_poll_ms: default_receipt_poll_ms(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_ms)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }
}
