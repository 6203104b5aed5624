//! Bloom Market
//!
//! Everything between the contract ports and a front end:
//!
//! - [`NftBook`]: tokens plus their off-chain metadata
//! - [`AuctionBook`]: listed auctions as display-ready views, with the NFT
//!   being sold attached
//! - [`AuctionFilter`]: the active / ended / settle / mine / bids tabs
//! - [`MarketSync`]: background poller keeping a [`MarketSnapshot`] fresh and
//!   ticking countdowns between polls
//! - [`Marketplace`]: mint, list, bid, settle and cancel, validated locally
//!   before a transaction is sent
//!
//! ## Data Flow
//!
//! ```text
//!  AuctionReader ──► AuctionBook ──┐
//!        │                         ├──► MarketSync ──watch──► MarketSnapshot
//!  MetadataFetcher ──► NftBook ────┘        ▲
//!                                           │ refresh()
//!  AuctionWriter ◄── Marketplace ───────────┘
//! ```

pub mod auction_book;
pub mod card;
pub mod error;
pub mod filter;
pub mod marketplace;
pub mod nft_book;
pub mod snapshot;
pub mod sync;

// Re-export main types for convenience
pub use auction_book::AuctionBook;
pub use card::AuctionCard;
pub use error::{ActionError, ActionResult, MarketError, Result};
pub use filter::AuctionFilter;
pub use marketplace::Marketplace;
pub use nft_book::NftBook;
pub use snapshot::MarketSnapshot;
pub use sync::{MarketSync, SyncConfig, SyncHandle};
