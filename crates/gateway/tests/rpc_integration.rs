//! Integration test: BloomContract / IpfsGateway <-> HTTP stub
//!
//! Spins up a tiny axum server that speaks just enough JSON-RPC (and serves
//! `/ipfs/...` documents) to exercise the real HTTP + ABI paths:
//! Contract call -> eth_call -> ABI decode -> domain record

use alloy_primitives::{Address, B256, Bytes, U256};
use alloy_sol_types::{SolCall, SolEvent, SolValue};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use bloom_core::Wei;
use bloom_gateway::{
    BloomContract, GatewayConfig, IpfsGateway, NetworkInfo, abi::IBloomNFT,
};
use bloom_ports::{AuctionReader, AuctionWriter, ContractError, MetadataError, MetadataFetcher};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

const CID: &str = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG";
const MISSING_CID: &str = "QmZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZZ";

// ============================================================================
// Stub chain
// ============================================================================

#[derive(Default)]
struct StubChain {
    contract: Address,
    /// (from, value, calldata) of every eth_sendTransaction
    sent: Mutex<Vec<(Address, Option<U256>, Bytes)>>,
    receipt_polls: AtomicUsize,
    /// Receipt requests still to be answered with HTTP 503
    flaky_receipts: AtomicUsize,
    ipfs_hits: AtomicUsize,
    http_hits: AtomicUsize,
}

fn seller() -> Address {
    Address::repeat_byte(0x5e)
}

fn account() -> Address {
    Address::repeat_byte(0xac)
}

fn mint_hash() -> B256 {
    B256::repeat_byte(0x11)
}

fn reverted_hash() -> B256 {
    B256::repeat_byte(0x22)
}

impl StubChain {
    fn call(&self, data: &[u8]) -> Result<Vec<u8>, String> {
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or("short calldata")?;

        match selector {
            s if s == IBloomNFT::totalSupplyCall::SELECTOR => {
                Ok((U256::from(2),).abi_encode_params())
            }
            s if s == IBloomNFT::getAuctionCall::SELECTOR => {
                let call = IBloomNFT::getAuctionCall::abi_decode(data, true)
                    .map_err(|e| e.to_string())?;
                if call.tokenId != U256::from(1) {
                    return Err("execution reverted: ERC721: invalid token ID".into());
                }
                let auction = IBloomNFT::Auction {
                    tokenId: U256::from(1),
                    seller: seller(),
                    startingBid: U256::from(500_000_000_000_000_000u64),
                    highestBid: U256::ZERO,
                    highestBidder: Address::ZERO,
                    startTime: U256::from(1_700_000_000u64),
                    endTime: U256::from(1_700_086_400u64),
                    active: true,
                    ended: false,
                };
                Ok((auction,).abi_encode_params())
            }
            s if s == IBloomNFT::tokenURICall::SELECTOR => {
                Ok((format!("ipfs://{}", CID),).abi_encode_params())
            }
            s if s == IBloomNFT::ownerOfCall::SELECTOR => Ok((seller(),).abi_encode_params()),
            s if s == IBloomNFT::isInAuctionCall::SELECTOR => Ok((true,).abi_encode_params()),
            s if s == IBloomNFT::biayaAdminCall::SELECTOR => {
                Ok((U256::from(1_000_000_000_000_000u64),).abi_encode_params())
            }
            _ => Err("unknown selector".into()),
        }
    }

    fn send(&self, tx: &Value) -> B256 {
        let from: Address = serde_json::from_value(tx["from"].clone()).unwrap();
        let value: Option<U256> = serde_json::from_value(tx["value"].clone()).ok();
        let data: Bytes = serde_json::from_value(tx["data"].clone()).unwrap();
        let is_bid = data.starts_with(&IBloomNFT::bidCall::SELECTOR);
        self.sent.lock().unwrap().push((from, value, data));

        if is_bid { reverted_hash() } else { mint_hash() }
    }

    fn receipt(&self, hash: B256) -> Value {
        // First poll: still pending
        if self.receipt_polls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Value::Null;
        }

        if hash == reverted_hash() {
            return json!({
                "transactionHash": hash,
                "blockNumber": "0x2",
                "status": "0x0",
                "logs": []
            });
        }

        let mut token_topic = [0u8; 32];
        token_topic[31] = 3;
        let mut creator_topic = [0u8; 32];
        creator_topic[12..].copy_from_slice(account().as_slice());

        json!({
            "transactionHash": hash,
            "blockNumber": "0x1",
            "status": "0x1",
            "logs": [{
                "address": self.contract,
                "topics": [
                    IBloomNFT::NFTMinted::SIGNATURE_HASH,
                    B256::from(token_topic),
                    B256::from(creator_topic),
                ],
                "data": Bytes::from((format!("ipfs://{}", CID),).abi_encode_params()),
            }]
        })
    }
}

async fn rpc_handler(
    State(chain): State<Arc<StubChain>>,
    Json(req): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let id = req["id"].clone();
    let params = &req["params"];

    if req["method"] == "eth_getTransactionReceipt"
        && chain
            .flaky_receipts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    let result = match req["method"].as_str().unwrap_or_default() {
        "eth_chainId" => Ok(json!("0x106a")),
        "eth_getCode" => Ok(json!("0x6080604052")),
        "eth_call" => {
            let data: Bytes = serde_json::from_value(params[0]["data"].clone()).unwrap();
            chain.call(&data).map(|out| json!(Bytes::from(out)))
        }
        "eth_sendTransaction" => Ok(json!(chain.send(&params[0]))),
        "eth_getTransactionReceipt" => {
            let hash: B256 = serde_json::from_value(params[0].clone()).unwrap();
            Ok(chain.receipt(hash))
        }
        other => Err(format!("method {} not found", other)),
    };

    Ok(Json(match result {
        Ok(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        Err(message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": 3, "message": message }
        }),
    }))
}

async fn ipfs_handler(
    State(chain): State<Arc<StubChain>>,
    Path(rest): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    chain.ipfs_hits.fetch_add(1, Ordering::SeqCst);
    if rest != CID {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({
        "name": "Bloom #1",
        "description": "First bloom",
        "image": format!("ipfs://{}", CID),
        "attributes": [{ "trait_type": "Petals", "value": 5 }]
    })))
}

/// Mutable off-chain metadata host
async fn http_handler(State(chain): State<Arc<StubChain>>) -> Json<Value> {
    let hits = chain.http_hits.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({ "name": format!("Revision {}", hits) }))
}

async fn spawn_stub(chain: Arc<StubChain>) -> String {
    let app = Router::new()
        .route("/", post(rpc_handler))
        .route("/ipfs/{*rest}", get(ipfs_handler))
        .route("/docs/{*rest}", get(http_handler))
        .with_state(chain);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

// ============================================================================
// Test Fixtures
// ============================================================================

async fn setup(with_account: bool) -> (Arc<StubChain>, BloomContract, String) {
    let _ = env_logger::try_init();

    let chain = Arc::new(StubChain {
        contract: Address::repeat_byte(0xc0),
        ..Default::default()
    });
    let url = spawn_stub(chain.clone()).await;

    let config = GatewayConfig {
        rpc_url: url.clone(),
        contract_address: Some(chain.contract),
        account: with_account.then(account),
        receipt_poll_ms: 10,
        receipt_timeout_secs: 5,
        ..Default::default()
    };

    (chain, BloomContract::new(&config).unwrap(), url)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_reads_decode_into_domain_types() {
    let (_chain, contract, _) = setup(false).await;

    assert_eq!(contract.total_supply().await.unwrap(), 2);

    let auction = contract.get_auction(1).await.unwrap();
    assert_eq!(auction.token_id, 1);
    assert_eq!(auction.seller, seller());
    assert_eq!(auction.end_time, 1_700_086_400);
    assert!(auction.active && !auction.ended);

    let info = contract.nft_info(1).await.unwrap();
    assert_eq!(info.token_uri, format!("ipfs://{}", CID));
    assert_eq!(info.owner, seller());
    assert!(info.is_in_auction);

    assert_eq!(contract.admin_fee().await.unwrap(), Wei::from(1_000_000_000_000_000u64));
}

#[tokio::test]
async fn test_reverted_call_maps_to_reverted_error() {
    let (_chain, contract, _) = setup(false).await;

    let err = contract.get_auction(2).await.unwrap_err();
    assert!(matches!(err, ContractError::Reverted(msg) if msg.contains("invalid token")));
}

#[tokio::test]
async fn test_network_probe() {
    let (_chain, contract, _) = setup(false).await;

    let info = NetworkInfo::probe(contract.rpc(), contract.address())
        .await
        .unwrap();
    assert_eq!(info.chain_id, 4202);
    assert_eq!(info.name, "Lisk Sepolia");
    assert!(info.has_code);
}

#[tokio::test]
async fn test_mint_waits_for_receipt_and_reads_token_id() {
    let (chain, contract, _) = setup(true).await;
    let fee = contract.admin_fee().await.unwrap();

    let minted = contract.mint(CID, fee).await.unwrap();
    assert_eq!(minted.token_id, Some(3));
    assert_eq!(minted.receipt.block_number, Some(1));
    // One pending poll, then the receipt
    assert_eq!(chain.receipt_polls.load(Ordering::SeqCst), 2);

    let sent = chain.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let (from, value, data) = &sent[0];
    assert_eq!(*from, account());
    assert_eq!(*value, Some(fee));
    let call = IBloomNFT::mintCall::abi_decode(data, true).unwrap();
    assert_eq!(call.ipfsHash, CID);
}

#[tokio::test]
async fn test_receipt_wait_survives_node_hiccups() {
    let (chain, contract, _) = setup(true).await;
    let fee = contract.admin_fee().await.unwrap();
    chain.flaky_receipts.store(2, Ordering::SeqCst);

    let minted = contract.mint(CID, fee).await.unwrap();
    assert_eq!(minted.token_id, Some(3));
    assert_eq!(chain.flaky_receipts.load(Ordering::SeqCst), 0);
    assert_eq!(chain.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_receipt_is_a_revert() {
    let (_chain, contract, _) = setup(true).await;

    let err = contract
        .bid(1, Wei::from(600_000_000_000_000_000u64))
        .await
        .unwrap_err();
    assert!(matches!(err, ContractError::Reverted(_)));
}

#[tokio::test]
async fn test_metadata_fetch_caches_documents() {
    let (chain, _contract, url) = setup(false).await;
    let gateway = IpfsGateway::new(&url, Duration::from_secs(5)).unwrap();

    let first = gateway
        .fetch_metadata(&format!("ipfs://{}", CID))
        .await
        .unwrap();
    assert_eq!(first.name, "Bloom #1");
    assert_eq!(first.attributes.len(), 1);

    let second = gateway.fetch_metadata(CID).await.unwrap();
    assert_eq!(second, first);
    assert_eq!(chain.ipfs_hits.load(Ordering::SeqCst), 1);
    assert_eq!(gateway.cached(), 1);
}

#[tokio::test]
async fn test_plain_http_metadata_is_not_cached() {
    let (chain, _contract, url) = setup(false).await;
    let gateway = IpfsGateway::new(&url, Duration::from_secs(5)).unwrap();
    let uri = format!("{}/docs/token-1.json", url);

    let first = gateway.fetch_metadata(&uri).await.unwrap();
    let second = gateway.fetch_metadata(&uri).await.unwrap();

    assert_eq!(first.name, "Revision 1");
    assert_eq!(second.name, "Revision 2");
    assert_eq!(chain.http_hits.load(Ordering::SeqCst), 2);
    assert_eq!(gateway.cached(), 0);
}

#[tokio::test]
async fn test_metadata_http_error() {
    let (_chain, _contract, url) = setup(false).await;
    let gateway = IpfsGateway::new(&url, Duration::from_secs(5)).unwrap();

    let err = gateway
        .fetch_metadata(&format!("ipfs://{}", MISSING_CID))
        .await
        .unwrap_err();
    assert!(matches!(err, MetadataError::Status { status: 404, .. }));
}
