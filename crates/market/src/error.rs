use bloom_core::{TokenId, UnitsError};
use bloom_ports::ContractError;
use thiserror::Error;

/// Errors loading the marketplace read-models
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarketError {
    #[error("Contract read failed: {0}")]
    Contract(#[from] ContractError),

    #[error("Sync task has stopped")]
    SyncStopped,
}

pub type Result<T> = std::result::Result<T, MarketError>;

/// Errors from a marketplace action, raised before or while transacting
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("No account connected")]
    NoAccount,

    #[error("IPFS hash is required")]
    EmptyIpfsHash,

    #[error(transparent)]
    InvalidAmount(#[from] UnitsError),

    #[error("Starting bid must be greater than zero")]
    ZeroStartingBid,

    #[error("Duration must be greater than zero")]
    ZeroDuration,

    #[error("Bid must be at least {min} ETH")]
    BidTooLow { min: String },

    #[error("Token {0} is not listed in an auction")]
    NotListed(TokenId),

    #[error("{0}")]
    NotAllowed(String),

    #[error(transparent)]
    Contract(#[from] ContractError),
}

pub type ActionResult<T> = std::result::Result<T, ActionError>;
