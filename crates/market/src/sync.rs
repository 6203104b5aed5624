//! Background sync of the marketplace read-models
//!
//! One task owns the refresh loop:
//! - polls the chain immediately, then every `poll_interval`
//! - ticks countdowns every `tick_interval` from the local clock only
//! - serves on-demand refreshes (after a transaction) and resets the poll
//!   timer when it does
//!
//! Consumers read the latest [`MarketSnapshot`] from a watch channel.

use bloom_core::Address;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};

use crate::auction_book::AuctionBook;
use crate::error::{MarketError, Result};
use crate::snapshot::MarketSnapshot;

/// Sync task settings
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Time between chain polls
    pub poll_interval: Duration,
    /// Time between countdown ticks
    pub tick_interval: Duration,
    /// Also load every minted NFT on each poll
    pub load_all_nfts: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            tick_interval: Duration::from_secs(1),
            load_all_nfts: true,
        }
    }
}

/// Completed once the requested refresh has been published
type RefreshRequest = oneshot::Sender<()>;

/// Cloneable access to a running [`MarketSync`]
#[derive(Clone)]
pub struct SyncHandle {
    refresh_tx: mpsc::Sender<RefreshRequest>,
    snapshot_rx: watch::Receiver<MarketSnapshot>,
}

impl SyncHandle {
    /// Refresh now and wait until the new snapshot is published
    pub async fn refresh(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.refresh_tx
            .send(done_tx)
            .await
            .map_err(|_| MarketError::SyncStopped)?;
        done_rx.await.map_err(|_| MarketError::SyncStopped)
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MarketSnapshot> {
        self.snapshot_rx.clone()
    }
}

/// The running sync task
pub struct MarketSync {
    handle: SyncHandle,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl MarketSync {
    /// Start syncing on the current runtime
    pub fn spawn(auctions: Arc<AuctionBook>, viewer: Option<Address>, config: SyncConfig) -> Self {
        let (snapshot_tx, snapshot_rx) = watch::channel(MarketSnapshot::default());
        let (refresh_tx, refresh_rx) = mpsc::channel(16);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let worker = SyncWorker {
            auctions,
            viewer,
            config,
            snapshot_tx,
        };
        let task = tokio::spawn(worker.run(refresh_rx, shutdown_rx));

        Self {
            handle: SyncHandle {
                refresh_tx,
                snapshot_rx,
            },
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    pub fn handle(&self) -> SyncHandle {
        self.handle.clone()
    }

    pub fn snapshot(&self) -> MarketSnapshot {
        self.handle.snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<MarketSnapshot> {
        self.handle.subscribe()
    }

    pub async fn refresh(&self) -> Result<()> {
        self.handle.refresh().await
    }

    /// Stop the task and wait for it to finish
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!("Sync task ended abnormally: {}", e);
        }
    }
}

struct SyncWorker {
    auctions: Arc<AuctionBook>,
    viewer: Option<Address>,
    config: SyncConfig,
    snapshot_tx: watch::Sender<MarketSnapshot>,
}

impl SyncWorker {
    async fn run(
        self,
        mut refresh_rx: mpsc::Receiver<RefreshRequest>,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) {
        info!(
            "Market sync started (poll {:?}, tick {:?})",
            self.config.poll_interval, self.config.tick_interval
        );

        // First tick fires immediately
        let mut poll = interval(self.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut tick = interval_at(
            Instant::now() + self.config.tick_interval,
            self.config.tick_interval,
        );
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown_rx => break,

                Some(done) = refresh_rx.recv() => {
                    self.refresh().await;
                    poll.reset();
                    let _ = done.send(());
                }

                _ = poll.tick() => self.refresh().await,

                _ = tick.tick() => self.retick(),
            }
        }

        info!("Market sync stopped");
    }

    fn retick(&self) {
        let now = self.auctions.clock().unix_seconds();
        self.snapshot_tx.send_modify(|snapshot| snapshot.retick(now));
    }

    async fn refresh(&self) {
        self.snapshot_tx.send_modify(|snapshot| snapshot.loading = true);

        let nfts = self.auctions.nfts();
        let (auctions, my_nfts, all_nfts) = tokio::join!(
            self.auctions.fetch_auctions(),
            nfts.my_nfts(self.viewer),
            async {
                if self.config.load_all_nfts {
                    nfts.all_nfts().await.map(Some)
                } else {
                    Ok(None)
                }
            }
        );

        let mut errors = Vec::new();
        let auctions = auctions.map_err(|e| errors.push(format!("Failed to fetch auctions: {}", e))).ok();
        let my_nfts = my_nfts.map_err(|e| errors.push(format!("Failed to fetch NFTs: {}", e))).ok();
        let all_nfts = all_nfts
            .map_err(|e| errors.push(format!("Failed to fetch all NFTs: {}", e)))
            .ok()
            .flatten();

        let clock = self.auctions.clock();
        let now = clock.unix_seconds();
        let error = (!errors.is_empty()).then(|| errors.join("; "));
        match &error {
            Some(e) => warn!("Market refresh failed: {}", e),
            None => debug!(
                "Market refreshed: {} auctions, {} owned NFTs",
                auctions.as_ref().map_or(0, Vec::len),
                my_nfts.as_ref().map_or(0, Vec::len)
            ),
        }

        let completed = error.is_none().then(|| clock.now());
        self.snapshot_tx.send_modify(move |snapshot| {
            if let Some(auctions) = auctions {
                snapshot.auctions = auctions;
            }
            if let Some(my_nfts) = my_nfts {
                snapshot.my_nfts = my_nfts;
            }
            if let Some(all_nfts) = all_nfts {
                snapshot.all_nfts = all_nfts;
            }
            snapshot.retick(now);
            snapshot.loading = false;
            snapshot.error = error;
            if completed.is_some() {
                snapshot.refreshed_at = completed;
            }
        });
    }
}
