//! Network / deployment probe

use bloom_core::Address;
use serde::Serialize;
use std::fmt;

use crate::error::RpcError;
use crate::rpc::RpcClient;

/// Lisk Sepolia testnet, where the marketplace contract is deployed
pub const LISK_SEPOLIA_CHAIN_ID: u64 = 4202;

/// What the node reports about the chain and the contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub chain_id: u64,
    pub name: String,
    pub contract_address: Address,
    /// Whether any bytecode is deployed at `contract_address`
    pub has_code: bool,
}

impl NetworkInfo {
    /// Ask the node for its chain id and the code at `contract_address`
    pub async fn probe(rpc: &RpcClient, contract_address: Address) -> Result<Self, RpcError> {
        let chain_id = rpc.chain_id().await?;
        let code = rpc.get_code(contract_address).await?;

        Ok(Self {
            chain_id,
            name: network_name(chain_id),
            contract_address,
            has_code: !code.is_empty(),
        })
    }

    /// `0x1234...abcd`
    pub fn short_address(&self) -> String {
        short_address(&self.contract_address)
    }
}

impl fmt::Display for NetworkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (Chain ID: {}) contract {} {}",
            self.name,
            self.chain_id,
            self.short_address(),
            if self.has_code { "deployed" } else { "NOT deployed" }
        )
    }
}

/// Display name for a chain id
pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        LISK_SEPOLIA_CHAIN_ID => "Lisk Sepolia".to_string(),
        other => format!("Chain {}", other),
    }
}

/// First six and last four characters of the checksummed address
pub fn short_address(address: &Address) -> String {
    let full = address.to_checksum(None);
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}
