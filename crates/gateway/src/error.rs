//! Error types for the gateway crate

use bloom_ports::ContractError;
use thiserror::Error;

/// JSON-RPC transport errors
#[derive(Error, Debug)]
pub enum RpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    Decode(String),
}

impl RpcError {
    /// The node was unreachable or overloaded; the same request may succeed later
    pub fn is_transient(&self) -> bool {
        match self {
            RpcError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            RpcError::Status { status, .. } => *status == 429 || *status >= 500,
            RpcError::Rpc { .. } | RpcError::Decode(_) => false,
        }
    }
}

/// Gateway setup errors
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No contract address configured")]
    MissingContractAddress,

    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),
}

/// Convert infrastructure RpcError to the port-level ContractError
impl From<RpcError> for ContractError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::Http(e) => ContractError::Transport(e.to_string()),
            RpcError::Status { status, body } => {
                ContractError::Transport(format!("HTTP {}: {}", status, body))
            }
            RpcError::Rpc { message, .. } if message.contains("revert") => {
                ContractError::Reverted(message)
            }
            RpcError::Rpc { code, message } => ContractError::Rpc { code, message },
            RpcError::Decode(msg) => ContractError::Decode(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_messages_map_to_reverted() {
        let err: ContractError = RpcError::Rpc {
            code: 3,
            message: "execution reverted: Auction not active".into(),
        }
        .into();
        assert_eq!(
            err,
            ContractError::Reverted("execution reverted: Auction not active".into())
        );

        let err: ContractError = RpcError::Rpc {
            code: -32601,
            message: "method not found".into(),
        }
        .into();
        assert!(matches!(err, ContractError::Rpc { code: -32601, .. }));
    }

    #[test]
    fn test_transient_statuses() {
        let status = |status| RpcError::Status {
            status,
            body: String::new(),
        };
        assert!(status(503).is_transient());
        assert!(status(429).is_transient());
        assert!(!status(400).is_transient());
        assert!(!RpcError::Decode("bad".into()).is_transient());
        assert!(
            !RpcError::Rpc {
                code: -32000,
                message: "nonce too low".into()
            }
            .is_transient()
        );
    }
}
