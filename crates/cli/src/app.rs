//! Wiring of ports to either the live contract or the in-memory chain

use anyhow::{Context, Result};
use bloom_clock::{ManualClock, SystemClock};
use bloom_core::Address;
use bloom_gateway::{BloomContract, IpfsGateway, NetworkInfo};
use bloom_market::{AuctionBook, Marketplace, NftBook};
use bloom_ports::{AuctionReader, AuctionWriter, Clock, MetadataFetcher};
use bloom_sim::{SimulatedChain, StaticMetadata, seed_demo};
use log::info;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppConfig;

/// Where reads and writes go
pub enum Backend {
    Rpc(Arc<BloomContract>),
    Simulated {
        chain: Arc<SimulatedChain>,
        clock: Arc<ManualClock>,
    },
}

pub struct App {
    pub backend: Backend,
    reader: Arc<dyn AuctionReader>,
    writer: Arc<dyn AuctionWriter>,
    metadata: Arc<dyn MetadataFetcher>,
    clock: Arc<dyn Clock>,
    concurrency: usize,
}

impl App {
    /// Talk to the configured node and IPFS gateway
    pub fn connect(config: &AppConfig) -> Result<Self> {
        let gateway = &config.gateway;
        let contract = Arc::new(
            BloomContract::new(gateway)
                .context("Set a contract address with --contract or BLOOM_CONTRACT_ADDRESS")?,
        );
        let metadata = Arc::new(IpfsGateway::new(
            &gateway.ipfs_gateway,
            gateway.request_timeout(),
        )?);

        info!(
            "Using contract {} via {}",
            contract.address(),
            contract.rpc().url()
        );

        Ok(Self {
            backend: Backend::Rpc(contract.clone()),
            reader: contract.clone(),
            writer: contract,
            metadata,
            clock: Arc::new(SystemClock::new()),
            concurrency: config.metadata_concurrency,
        })
    }

    /// In-memory chain seeded with demo auctions; acts as `account` or the
    /// demo seller
    pub async fn simulated(config: &AppConfig, account: Option<Address>) -> Result<Self> {
        let clock = ManualClock::new(None);
        let chain = SimulatedChain::new(clock.clone());
        let metadata = Arc::new(StaticMetadata::new());

        let accounts = seed_demo(&chain, &metadata)
            .await
            .context("Seeding demo marketplace")?;
        let account = account.unwrap_or(accounts.alice);
        info!("Simulating as {}", account);

        Ok(Self {
            reader: chain.clone(),
            writer: Arc::new(chain.as_account(account)),
            metadata,
            clock: clock.clone(),
            backend: Backend::Simulated { chain, clock },
            concurrency: config.metadata_concurrency,
        })
    }

    pub fn viewer(&self) -> Option<Address> {
        self.writer.account()
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn reader(&self) -> &Arc<dyn AuctionReader> {
        &self.reader
    }

    pub fn nft_book(&self) -> Arc<NftBook> {
        Arc::new(
            NftBook::new(self.reader.clone(), self.metadata.clone())
                .with_concurrency(self.concurrency),
        )
    }

    pub fn auction_book(&self) -> Arc<AuctionBook> {
        Arc::new(AuctionBook::new(self.nft_book(), self.clock.clone()))
    }

    pub fn marketplace(&self) -> Marketplace {
        Marketplace::new(self.writer.clone(), self.auction_book())
    }

    /// Network facts for the `network` command
    pub async fn network(&self) -> Result<String> {
        match &self.backend {
            Backend::Rpc(contract) => {
                let info = NetworkInfo::probe(contract.rpc(), contract.address()).await?;
                Ok(info.to_string())
            }
            Backend::Simulated { chain, .. } => {
                let supply = chain.total_supply().await?;
                Ok(format!("Simulated chain (in memory), {} tokens minted", supply))
            }
        }
    }

    /// Keep simulated time moving in step with wall time
    pub fn drive_simulated_clock(&self) -> Option<tokio::task::JoinHandle<()>> {
        let Backend::Simulated { clock, .. } = &self.backend else {
            return None;
        };
        let clock = clock.clone();
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            ticker.tick().await;
            loop {
                ticker.tick().await;
                clock.advance_secs(1);
            }
        }))
    }
}
