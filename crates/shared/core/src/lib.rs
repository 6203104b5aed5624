//! Bloom Core Domain
//!
//! Pure domain types for the Bloom NFT auction marketplace.
//! This crate contains no async, no I/O, and is 100% unit testable.
//!
//! Raw contract reads ([`AuctionRecord`]) are kept in wei; the display-ready
//! read-model ([`AuctionView`], [`Nft`]) carries ether strings and countdowns.

pub mod entities;
pub mod units;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AttributeValue, AuctionDuration, AuctionPermissions, AuctionRecord, AuctionStatus,
    AuctionView, ENDING_SOON_SECS, Nft, NftAttribute, NftMetadata,
};
pub use units::{MIN_BID_INCREMENT, ONE_ETHER, UnitsError, format_ether, parse_ether};
pub use values::{Address, TokenId, UnixSeconds, Wei, Timestamp};
