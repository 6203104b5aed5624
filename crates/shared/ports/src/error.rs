use bloom_core::TokenId;
use thiserror::Error;

/// Errors from reading or writing the auction contract
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Transaction reverted: {0}")]
    Reverted(String),

    #[error("Could not decode contract response: {0}")]
    Decode(String),

    #[error("Token {0} does not exist")]
    UnknownToken(TokenId),

    #[error("Timed out waiting for receipt of {0}")]
    ReceiptTimeout(String),

    #[error("No account configured for sending transactions")]
    NoAccount,
}

pub type ContractResult<T> = std::result::Result<T, ContractError>;

/// Errors from resolving and fetching token metadata
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Unsupported token URI: {0}")]
    UnsupportedUri(String),

    #[error("Fetch failed for {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    #[error("HTTP {status} fetching {uri}")]
    Status { uri: String, status: u16 },

    #[error("Invalid metadata at {uri}: {reason}")]
    Parse { uri: String, reason: String },
}

pub type MetadataResult<T> = std::result::Result<T, MetadataError>;
