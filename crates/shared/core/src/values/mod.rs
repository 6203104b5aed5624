use chrono::{DateTime, Utc};

/// Chain account / contract address
///
/// Comparison is byte-wise, so two addresses written with different hex
/// casing are equal.
pub use alloy_primitives::Address;

/// Token identifier (ERC-721 token id; the contract mints from 1 upwards)
pub type TokenId = u64;

/// Fixed-point currency amount in wei (1 ether = 10^18 wei)
pub type Wei = alloy_primitives::U256;

/// On-chain timestamp in seconds since the unix epoch
pub type UnixSeconds = u64;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;
