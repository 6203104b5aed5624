//! Bloom Ports
//!
//! Port definitions (traits) for the Bloom marketplace.
//! These define the boundaries between the read-models and infrastructure:
//! the JSON-RPC gateway and the in-memory chain both implement them.

mod clock;
mod contract;
mod error;
mod metadata;

pub use clock::Clock;
pub use contract::{AuctionReader, AuctionWriter, MintReceipt, NftInfo, TxReceipt};
pub use error::{ContractError, ContractResult, MetadataError, MetadataResult};
pub use metadata::MetadataFetcher;
