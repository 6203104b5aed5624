//! Front-end configuration
//!
//! Layered, lowest precedence first:
//! 1. built-in defaults
//! 2. JSON file (`--config`)
//! 3. `BLOOM_*` environment variables
//! 4. command-line flags
//!
//! Layers 3 and 4 are both resolved by clap and handed over as
//! [`Overrides`].

use bloom_core::Address;
use bloom_gateway::GatewayConfig;
use bloom_market::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything the front end needs to reach the marketplace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RPC endpoint, contract, account and IPFS gateway
    #[serde(flatten)]
    pub gateway: GatewayConfig,

    /// Seconds between chain polls in `watch`
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Milliseconds between countdown ticks in `watch`
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Tokens loaded at once when listing NFTs
    #[serde(default = "default_metadata_concurrency")]
    pub metadata_concurrency: usize,
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_tick_interval_ms() -> u64 {
    1_000
}

fn default_metadata_concurrency() -> usize {
    8
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            poll_interval_secs: default_poll_interval_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            metadata_concurrency: default_metadata_concurrency(),
        }
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub rpc_url: Option<String>,
    pub contract_address: Option<Address>,
    pub account: Option<Address>,
    pub ipfs_gateway: Option<String>,
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults, or the file at `path` when given, with overrides applied
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        let gateway = &mut self.gateway;
        if let Some(rpc_url) = overrides.rpc_url {
            gateway.rpc_url = rpc_url;
        }
        if let Some(address) = overrides.contract_address {
            gateway.contract_address = Some(address);
        }
        if let Some(account) = overrides.account {
            gateway.account = Some(account);
        }
        if let Some(ipfs_gateway) = overrides.ipfs_gateway {
            gateway.ipfs_gateway = ipfs_gateway;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid("poll_interval_secs must be positive".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive".into()));
        }
        if self.metadata_concurrency == 0 {
            return Err(ConfigError::Invalid(
                "metadata_concurrency must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            load_all_nfts: true,
        }
    }
}
