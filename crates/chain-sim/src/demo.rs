//! Demo marketplace used by `bloom --simulate`
//!
//! Leaves the chain with one auction in every interesting state:
//!
//! | token | seller | state                                   |
//! |-------|--------|-----------------------------------------|
//! | 1     | alice  | live, two bids                          |
//! | 2     | alice  | past its end, waiting for `endAuction`  |
//! | 3     | alice  | never auctioned                         |
//! | 4     | bob    | live, ending within the hour, no bids   |
//! | 5     | bob    | settled, won by alice                   |
//! | 6     | carol  | never auctioned, metadata missing       |

use bloom_core::{Address, AttributeValue, AuctionDuration, NftAttribute, NftMetadata, Wei};
use bloom_ports::AuctionReader;
use log::info;
use std::sync::Arc;

use crate::chain::SimulatedChain;
use crate::error::Result;
use crate::metadata::StaticMetadata;

/// 0.001 ETH
const FINNEY: Wei = Wei::from_limbs([1_000_000_000_000_000, 0, 0, 0]);

fn finney(n: u64) -> Wei {
    Wei::from(n) * FINNEY
}

/// The accounts the demo data was created with
#[derive(Debug, Clone, Copy)]
pub struct DemoAccounts {
    pub alice: Address,
    pub bob: Address,
    pub carol: Address,
}

impl Default for DemoAccounts {
    fn default() -> Self {
        Self {
            alice: Address::repeat_byte(0xa1),
            bob: Address::repeat_byte(0xb0),
            carol: Address::repeat_byte(0xc4),
        }
    }
}

fn flower(name: &str, color: &str, petals: f64) -> NftMetadata {
    NftMetadata {
        name: name.to_string(),
        description: format!("A {} {} from the Bloom garden", color, name.to_lowercase()),
        image: format!("ipfs://Qm{}Image", name),
        attributes: vec![
            NftAttribute {
                trait_type: "Color".to_string(),
                value: AttributeValue::Text(color.to_string()),
            },
            NftAttribute {
                trait_type: "Petals".to_string(),
                value: AttributeValue::Number(petals),
            },
        ],
    }
}

/// Populate an empty chain and its metadata store, advancing the chain's
/// clock as needed
pub async fn seed_demo(chain: &Arc<SimulatedChain>, metadata: &StaticMetadata) -> Result<DemoAccounts> {
    let accounts = DemoAccounts::default();
    let DemoAccounts { alice, bob, carol } = accounts;
    let fee = chain.admin_fee().await.unwrap_or(FINNEY);

    let flowers = [
        (alice, "Sunflower", "yellow", 34.0),
        (alice, "Rose", "red", 5.0),
        (alice, "Tulip", "pink", 6.0),
        (bob, "Orchid", "purple", 3.0),
        (bob, "Lily", "white", 6.0),
    ];
    for (owner, name, color, petals) in flowers {
        let hash = format!("QmBloom{}", name);
        chain.mint_from(owner, &hash, fee).await?;
        metadata.insert(format!("ipfs://{}", hash), flower(name, color, petals));
    }
    // No document is published for this one
    chain.mint_from(carol, "QmBloomDaisy", fee).await?;

    let short = AuctionDuration::THREE_MINUTES.as_secs();
    chain.create_auction_from(alice, 2, finney(50), short).await?;
    chain.create_auction_from(bob, 5, finney(200), short).await?;
    chain.bid_from(bob, 2, finney(60)).await?;
    chain.bid_from(alice, 5, finney(300)).await?;

    chain.clock().advance_secs(5 * 60);
    chain.end_auction_from(bob, 5).await?;

    chain
        .create_auction_from(alice, 1, finney(100), AuctionDuration::ONE_DAY.as_secs())
        .await?;
    chain
        .create_auction_from(bob, 4, finney(250), AuctionDuration::ONE_HOUR.as_secs())
        .await?;
    chain.bid_from(bob, 1, finney(150)).await?;
    chain.bid_from(carol, 1, finney(200)).await?;

    chain.clock().advance_secs(10 * 60);

    info!("Seeded demo marketplace with 6 tokens");
    Ok(accounts)
}
