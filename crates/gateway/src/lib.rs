//! Bloom Gateway
//!
//! Infrastructure side of the marketplace ports:
//! - [`RpcClient`]: minimal Ethereum JSON-RPC over HTTP
//! - [`BloomContract`]: the auction contract's fixed ABI behind
//!   [`AuctionReader`](bloom_ports::AuctionReader) and
//!   [`AuctionWriter`](bloom_ports::AuctionWriter)
//! - [`IpfsGateway`]: resolves content-addressed token URIs and fetches
//!   metadata behind [`MetadataFetcher`](bloom_ports::MetadataFetcher)
//! - [`NetworkInfo`]: which chain we are talking to and whether the
//!   contract is deployed there
//!
//! ## Architecture
//!
//! ```text
//!   Read-models (bloom-market)
//!         │ ports
//!    ┌────▼──────────┐      ┌─────────────┐
//!    │ BloomContract │      │ IpfsGateway │
//!    └────┬──────────┘      └──────┬──────┘
//!         │ eth_call / eth_sendTransaction   │ GET <gateway>/ipfs/<cid>
//!    ┌────▼────┐                    ┌──────▼──────┐
//!    │ JSON-RPC│                    │ HTTP gateway│
//!    │  node   │                    └─────────────┘
//!    └─────────┘
//! ```
//!
//! Transactions go out with `eth_sendTransaction`, so the node (or the
//! wallet behind it) holds the keys and signs.

pub mod abi;
pub mod config;
pub mod contract;
pub mod error;
pub mod metadata;
pub mod network;
pub mod rpc;

// Re-export commonly used types
pub use config::GatewayConfig;
pub use contract::BloomContract;
pub use error::{GatewayError, RpcError};
pub use metadata::IpfsGateway;
pub use network::NetworkInfo;
pub use rpc::RpcClient;
