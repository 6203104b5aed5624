//! `bloom` - command-line front end for the Bloom NFT auction marketplace
//!
//! Reads go through `eth_call`; writes go out with `eth_sendTransaction`
//! from `--account`, so the node must hold (or proxy to) that account's key.
//! `--simulate` swaps the node for a seeded in-memory chain.

mod app;
mod config;
mod render;

use anyhow::Result;
use bloom_core::{Address, AuctionDuration, TokenId};
use bloom_market::{AuctionFilter, MarketSync};
use clap::{Parser, Subcommand};
use log::info;
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::app::App;
use crate::config::{AppConfig, Overrides};

#[derive(Parser)]
#[command(name = "bloom")]
#[command(about = "Browse, mint and bid on Bloom NFT auctions")]
struct Cli {
    /// JSON configuration file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// JSON-RPC endpoint
    #[arg(long, env = "BLOOM_RPC_URL", global = true)]
    rpc_url: Option<String>,

    /// Auction contract address
    #[arg(long, env = "BLOOM_CONTRACT_ADDRESS", global = true)]
    contract: Option<Address>,

    /// Account transactions are sent from
    #[arg(long, env = "BLOOM_ACCOUNT", global = true)]
    account: Option<Address>,

    /// HTTP gateway for ipfs:// links
    #[arg(long, env = "BLOOM_IPFS_GATEWAY", global = true)]
    ipfs_gateway: Option<String>,

    /// Run against an in-memory chain with demo data
    #[arg(long, global = true)]
    simulate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the connected network and contract deployment
    Network,

    /// List my NFTs, or every minted NFT with --all
    Nfts {
        #[arg(long)]
        all: bool,
    },

    /// List auctions on one tab
    Auctions {
        /// active, ended, settle, mine, bids or all
        #[arg(long, short, default_value = "active")]
        filter: AuctionFilter,
    },

    /// Show one auction card
    Auction { token_id: TokenId },

    /// Mint an NFT pointing at an IPFS metadata hash
    Mint { ipfs_hash: String },

    /// Put an owned NFT up for auction
    CreateAuction {
        token_id: TokenId,

        /// Starting bid in ETH
        starting_bid: Decimal,

        /// Seconds, or 3m / 1h / 6h / 12h / 1d / 3d / 7d
        #[arg(long, short, default_value = "1d")]
        duration: AuctionDuration,
    },

    /// Bid on a running auction
    Bid {
        token_id: TokenId,

        /// Amount in ETH
        amount: Decimal,
    },

    /// Settle an auction past its end time
    End { token_id: TokenId },

    /// Cancel an auction with no bids
    Cancel { token_id: TokenId },

    /// Keep polling and print tab counts on every refresh
    Watch {
        #[arg(long, short, default_value = "active")]
        filter: AuctionFilter,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let overrides = Overrides {
        rpc_url: cli.rpc_url,
        contract_address: cli.contract,
        account: cli.account,
        ipfs_gateway: cli.ipfs_gateway,
    };
    let config = AppConfig::load(cli.config.as_deref(), overrides)?;

    let app = if cli.simulate {
        App::simulated(&config, config.gateway.account).await?
    } else {
        App::connect(&config)?
    };

    run(cli.command, &app, &config).await
}

async fn run(command: Command, app: &App, config: &AppConfig) -> Result<()> {
    let viewer = app.viewer();
    let now = || app.clock().unix_seconds();

    match command {
        Command::Network => println!("{}", app.network().await?),

        Command::Nfts { all } => {
            let book = app.nft_book();
            if all {
                let nfts = book.all_nfts().await?;
                print!("{}", render::nft_grid("All NFTs", &nfts, "No NFTs minted yet"));
            } else {
                let nfts = book.my_nfts(viewer).await?;
                let empty = if viewer.is_some() {
                    "You don't own any NFTs yet"
                } else {
                    "Connect an account with --account to see your NFTs"
                };
                print!("{}", render::nft_grid("My NFTs", &nfts, empty));
            }
        }

        Command::Auctions { filter } => {
            let auctions = app.auction_book().fetch_auctions().await?;
            let now = now();
            let counts: Vec<_> = AuctionFilter::TABS
                .iter()
                .map(|tab| (*tab, tab.apply(&auctions, viewer.as_ref(), now).len()))
                .collect();

            println!("{}", render::tab_strip(&counts, filter));
            let shown = filter.apply(&auctions, viewer.as_ref(), now);
            let empty = format!("No auctions on the {} tab", filter.label());
            print!("{}", render::auction_grid(&shown, now, &empty));
        }

        Command::Auction { token_id } => {
            let card = app.marketplace().card(token_id).await?;
            print!("{}", render::auction_card(&card));
        }

        Command::Mint { ipfs_hash } => {
            let minted = app.marketplace().mint(&ipfs_hash).await?;
            println!("{}", render::mint_receipt(&minted));
        }

        Command::CreateAuction {
            token_id,
            starting_bid,
            duration,
        } => {
            let receipt = app
                .marketplace()
                .create_auction(token_id, starting_bid, duration.as_secs())
                .await?;
            println!(
                "{}",
                render::receipt(&format!("Auction for #{} ({})", token_id, duration), &receipt)
            );
        }

        Command::Bid { token_id, amount } => {
            let receipt = app.marketplace().bid(token_id, amount).await?;
            println!("{}", render::receipt(&format!("Bid of {} ETH", amount), &receipt));
        }

        Command::End { token_id } => {
            let receipt = app.marketplace().end_auction(token_id).await?;
            println!("{}", render::receipt("End auction", &receipt));
        }

        Command::Cancel { token_id } => {
            let receipt = app.marketplace().cancel_auction(token_id).await?;
            println!("{}", render::receipt("Cancel auction", &receipt));
        }

        Command::Watch { filter } => watch(app, config, filter).await?,
    }

    Ok(())
}

/// Print a summary on every completed refresh until Ctrl-C
async fn watch(app: &App, config: &AppConfig, filter: AuctionFilter) -> Result<()> {
    let viewer = app.viewer();
    let sync = MarketSync::spawn(app.auction_book(), viewer, config.sync_config());
    let clock_driver = app.drive_simulated_clock();
    let mut updates = sync.subscribe();
    let mut last_shown = None;

    info!("Watching marketplace, Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                // Countdown ticks alone are not worth a reprint
                let key = Some((snapshot.refreshed_at, snapshot.error.clone()));
                if snapshot.loading || key == last_shown {
                    continue;
                }
                last_shown = key;

                print!("{}", render::snapshot_summary(&snapshot, viewer.as_ref(), filter));
                let shown = snapshot.filtered(filter, viewer.as_ref());
                print!("{}", render::auction_grid(&shown, snapshot.now, "No auctions"));
            }
        }
    }

    if let Some(driver) = clock_driver {
        driver.abort();
    }
    sync.shutdown().await;
    Ok(())
}
