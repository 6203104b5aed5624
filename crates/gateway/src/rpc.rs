//! Minimal Ethereum JSON-RPC client
//!
//! Only the handful of methods the marketplace needs: `eth_call`,
//! `eth_chainId`, `eth_getCode`, `eth_sendTransaction` and
//! `eth_getTransactionReceipt`.

use alloy_primitives::{Address, B256, Bytes, U64, U256};
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::RpcError;

/// JSON-RPC client over HTTP
pub struct RpcClient {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

#[derive(Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// Transaction handed to the node for signing and broadcast
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub from: Address,
    pub to: Address,
    pub data: Bytes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<U256>,
}

/// Subset of a transaction receipt
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub block_number: Option<U64>,
    /// `0x1` success, `0x0` reverted
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub logs: Vec<RpcLog>,
}

impl RpcReceipt {
    pub fn succeeded(&self) -> bool {
        self.status.is_none_or(|s| s == U64::from(1))
    }
}

/// One log entry of a receipt
#[derive(Debug, Clone, Deserialize)]
pub struct RpcLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

impl RpcClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute a read-only call against the latest block
    pub async fn eth_call(&self, to: Address, data: Bytes) -> Result<Bytes, RpcError> {
        self.request("eth_call", json!([{ "to": to, "data": data }, "latest"]))
            .await
    }

    pub async fn chain_id(&self) -> Result<u64, RpcError> {
        let id: U64 = self.request("eth_chainId", json!([])).await?;
        Ok(id.to::<u64>())
    }

    pub async fn get_code(&self, address: Address) -> Result<Bytes, RpcError> {
        self.request("eth_getCode", json!([address, "latest"])).await
    }

    /// Submit a transaction for the node to sign; returns its hash
    pub async fn send_transaction(&self, tx: &TransactionRequest) -> Result<B256, RpcError> {
        self.request("eth_sendTransaction", json!([tx])).await
    }

    /// Receipt for a transaction, or `None` while it is still pending
    pub async fn get_transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<RpcReceipt>, RpcError> {
        self.request("eth_getTransactionReceipt", json!([hash]))
            .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        debug!("RPC #{} {} -> {}", id, method, self.url);

        let resp = self.client.post(&self.url).json(&body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(RpcError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: RpcResponse =
            serde_json::from_str(&text).map_err(|e| RpcError::Decode(e.to_string()))?;

        if let Some(err) = parsed.error {
            debug!("RPC #{} {} failed: {} {}", id, method, err.code, err.message);
            return Err(RpcError::Rpc {
                code: err.code,
                message: err.message,
            });
        }

        serde_json::from_value(parsed.result)
            .map_err(|e| RpcError::Decode(format!("{}: {}", method, e)))
    }
}
