mod auction;
mod duration;
mod nft;
mod permissions;
mod status;

pub use auction::{AuctionRecord, AuctionView};
pub use duration::AuctionDuration;
pub use nft::{AttributeValue, Nft, NftAttribute, NftMetadata};
pub use permissions::AuctionPermissions;
pub use status::{AuctionStatus, ENDING_SOON_SECS};
