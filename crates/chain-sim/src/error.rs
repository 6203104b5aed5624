use bloom_core::{TokenId, Wei, format_ether};
use bloom_ports::ContractError;
use thiserror::Error;

/// Reasons the simulated contract rejects a transaction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("Token {0} does not exist")]
    TokenNotFound(TokenId),

    #[error("IPFS hash is required")]
    EmptyHash,

    #[error("Admin fee of {} ETH required", format_ether(*required))]
    InsufficientFee { required: Wei },

    #[error("Caller is not the owner of token {0}")]
    NotOwner(TokenId),

    #[error("Token {0} is already in an auction")]
    AlreadyInAuction(TokenId),

    #[error("Starting bid must be greater than zero")]
    InvalidStartingBid,

    #[error("Duration must be greater than zero")]
    InvalidDuration,

    #[error("Auction for token {0} is not active")]
    AuctionNotActive(TokenId),

    #[error("Auction for token {0} has already ended")]
    AuctionExpired(TokenId),

    #[error("Auction for token {0} has not ended yet")]
    AuctionNotOver(TokenId),

    #[error("Seller cannot bid on their own auction")]
    SellerCannotBid,

    #[error("Bid too low: at least {} ETH required", format_ether(*min))]
    BidTooLow { min: Wei },

    #[error("Cannot cancel an auction that has bids")]
    HasBids,

    #[error("Simulated failure: {0}")]
    Injected(String),
}

pub type Result<T> = std::result::Result<T, SimError>;

impl From<SimError> for ContractError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::TokenNotFound(id) => ContractError::UnknownToken(id),
            SimError::Injected(msg) => ContractError::Transport(msg),
            other => ContractError::Reverted(other.to_string()),
        }
    }
}
