//! JSON-RPC adapter for the auction contract

use alloy_primitives::{B256, Bytes, U256};
use alloy_sol_types::{SolCall, SolEvent};
use async_trait::async_trait;
use bloom_core::{Address, AuctionRecord, TokenId, Wei};
use bloom_ports::{
    AuctionReader, AuctionWriter, ContractError, ContractResult, MintReceipt, TxReceipt,
};
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::Instant;

use crate::abi::{IBloomNFT, to_u64};
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::rpc::{RpcClient, RpcReceipt, TransactionRequest};

/// The BloomNFT contract reached through a JSON-RPC node
pub struct BloomContract {
    rpc: RpcClient,
    address: Address,
    account: Option<Address>,
    receipt_poll: Duration,
    receipt_timeout: Duration,
}

impl BloomContract {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let address = config
            .contract_address
            .ok_or(GatewayError::MissingContractAddress)?;
        let rpc = RpcClient::new(&config.rpc_url, config.request_timeout())?;

        Ok(Self {
            rpc,
            address,
            account: config.account,
            receipt_poll: config.receipt_poll_interval(),
            receipt_timeout: config.receipt_timeout(),
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Run a view call and decode its return values
    async fn call<C: SolCall + Send + Sync>(&self, call: C) -> ContractResult<C::Return> {
        let data = Bytes::from(call.abi_encode());
        let output = self.rpc.eth_call(self.address, data).await?;

        C::abi_decode_returns(&output, true).map_err(|e| {
            ContractError::Decode(format!("{}: {}", C::SIGNATURE, e))
        })
    }

    /// Send a state-changing call and wait for it to be mined
    async fn transact<C: SolCall + Send + Sync>(
        &self,
        call: C,
        value: Option<U256>,
    ) -> ContractResult<RpcReceipt> {
        let from = self.account.ok_or(ContractError::NoAccount)?;
        let tx = TransactionRequest {
            from,
            to: self.address,
            data: Bytes::from(call.abi_encode()),
            value,
        };

        let hash = self.rpc.send_transaction(&tx).await?;
        info!("Sent {} as {}", C::SIGNATURE, hash);

        let receipt = self.wait_for_receipt(hash).await?;
        if !receipt.succeeded() {
            warn!("{} reverted in {}", C::SIGNATURE, hash);
            return Err(ContractError::Reverted(format!(
                "{} reverted in transaction {}",
                C::SIGNATURE,
                hash
            )));
        }

        Ok(receipt)
    }

    /// Poll until the receipt appears; node hiccups are retried because the
    /// transaction is already out
    async fn wait_for_receipt(&self, hash: B256) -> ContractResult<RpcReceipt> {
        let deadline = Instant::now() + self.receipt_timeout;

        loop {
            match self.rpc.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => return Ok(receipt),
                Ok(None) => debug!("Receipt for {} pending", hash),
                Err(e) if e.is_transient() => warn!("Receipt poll for {} failed: {}", hash, e),
                Err(e) => return Err(e.into()),
            }
            if Instant::now() >= deadline {
                return Err(ContractError::ReceiptTimeout(hash.to_string()));
            }
            tokio::time::sleep(self.receipt_poll).await;
        }
    }

    /// Token id from the first `NFTMinted` log emitted by this contract
    fn minted_token_id(&self, receipt: &RpcReceipt) -> Option<TokenId> {
        receipt
            .logs
            .iter()
            .filter(|log| log.address == self.address)
            .filter(|log| log.topics.first() == Some(&IBloomNFT::NFTMinted::SIGNATURE_HASH))
            .find_map(|log| {
                IBloomNFT::NFTMinted::decode_raw_log(log.topics.iter().copied(), &log.data, true)
                    .ok()
            })
            .and_then(|event| to_u64(event.tokenId, "tokenId").ok())
    }
}

fn to_tx_receipt(receipt: &RpcReceipt) -> TxReceipt {
    TxReceipt {
        transaction_hash: receipt.transaction_hash.to_string(),
        block_number: receipt.block_number.map(|n| n.to::<u64>()),
    }
}

#[async_trait]
impl AuctionReader for BloomContract {
    async fn total_supply(&self) -> ContractResult<u64> {
        let ret = self.call(IBloomNFT::totalSupplyCall {}).await?;
        to_u64(ret._0, "totalSupply")
    }

    async fn get_auction(&self, token_id: TokenId) -> ContractResult<AuctionRecord> {
        let ret = self
            .call(IBloomNFT::getAuctionCall {
                tokenId: U256::from(token_id),
            })
            .await?;
        ret._0.into_record()
    }

    async fn token_uri(&self, token_id: TokenId) -> ContractResult<String> {
        let ret = self
            .call(IBloomNFT::tokenURICall {
                tokenId: U256::from(token_id),
            })
            .await?;
        Ok(ret._0)
    }

    async fn owner_of(&self, token_id: TokenId) -> ContractResult<Address> {
        let ret = self
            .call(IBloomNFT::ownerOfCall {
                tokenId: U256::from(token_id),
            })
            .await?;
        Ok(ret._0)
    }

    async fn is_in_auction(&self, token_id: TokenId) -> ContractResult<bool> {
        let ret = self
            .call(IBloomNFT::isInAuctionCall {
                tokenId: U256::from(token_id),
            })
            .await?;
        Ok(ret._0)
    }

    async fn is_auction_active(&self, token_id: TokenId) -> ContractResult<bool> {
        let ret = self
            .call(IBloomNFT::isAuctionActiveCall {
                tokenId: U256::from(token_id),
            })
            .await?;
        Ok(ret._0)
    }

    async fn time_remaining(&self, token_id: TokenId) -> ContractResult<u64> {
        let ret = self
            .call(IBloomNFT::getTimeRemainingCall {
                tokenId: U256::from(token_id),
            })
            .await?;
        to_u64(ret._0, "getTimeRemaining")
    }

    async fn balance_of(&self, owner: Address) -> ContractResult<u64> {
        let ret = self.call(IBloomNFT::balanceOfCall { owner }).await?;
        to_u64(ret._0, "balanceOf")
    }

    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: u64,
    ) -> ContractResult<TokenId> {
        let ret = self
            .call(IBloomNFT::tokenOfOwnerByIndexCall {
                owner,
                index: U256::from(index),
            })
            .await?;
        to_u64(ret._0, "tokenOfOwnerByIndex")
    }

    async fn token_by_index(&self, index: u64) -> ContractResult<TokenId> {
        let ret = self
            .call(IBloomNFT::tokenByIndexCall {
                index: U256::from(index),
            })
            .await?;
        to_u64(ret._0, "tokenByIndex")
    }

    async fn admin_fee(&self) -> ContractResult<Wei> {
        Ok(self.call(IBloomNFT::biayaAdminCall {}).await?._0)
    }

    async fn admin_fee_percentage(&self) -> ContractResult<u64> {
        let ret = self.call(IBloomNFT::adminFeePercentageCall {}).await?;
        to_u64(ret._0, "adminFeePercentage")
    }

    async fn accumulated_fees(&self) -> ContractResult<Wei> {
        Ok(self.call(IBloomNFT::getAccumulatedFeesCall {}).await?._0)
    }
}

#[async_trait]
impl AuctionWriter for BloomContract {
    fn account(&self) -> Option<Address> {
        self.account
    }

    async fn mint(&self, ipfs_hash: &str, admin_fee: Wei) -> ContractResult<MintReceipt> {
        let receipt = self
            .transact(
                IBloomNFT::mintCall {
                    ipfsHash: ipfs_hash.to_string(),
                },
                Some(admin_fee),
            )
            .await?;

        let token_id = self.minted_token_id(&receipt);
        if token_id.is_none() {
            warn!(
                "Mint {} succeeded but no NFTMinted event was found",
                receipt.transaction_hash
            );
        }

        Ok(MintReceipt {
            receipt: to_tx_receipt(&receipt),
            token_id,
        })
    }

    async fn create_auction(
        &self,
        token_id: TokenId,
        starting_bid: Wei,
        duration_secs: u64,
    ) -> ContractResult<TxReceipt> {
        let receipt = self
            .transact(
                IBloomNFT::createAuctionCall {
                    tokenId: U256::from(token_id),
                    startingBid: starting_bid,
                    durationInSecond: U256::from(duration_secs),
                },
                None,
            )
            .await?;
        Ok(to_tx_receipt(&receipt))
    }

    async fn bid(&self, token_id: TokenId, amount: Wei) -> ContractResult<TxReceipt> {
        let receipt = self
            .transact(
                IBloomNFT::bidCall {
                    tokenId: U256::from(token_id),
                },
                Some(amount),
            )
            .await?;
        Ok(to_tx_receipt(&receipt))
    }

    async fn end_auction(&self, token_id: TokenId) -> ContractResult<TxReceipt> {
        let receipt = self
            .transact(
                IBloomNFT::endAuctionCall {
                    tokenId: U256::from(token_id),
                },
                None,
            )
            .await?;
        Ok(to_tx_receipt(&receipt))
    }

    async fn cancel_auction(&self, token_id: TokenId) -> ContractResult<TxReceipt> {
        let receipt = self
            .transact(
                IBloomNFT::cancelAuctionCall {
                    tokenId: U256::from(token_id),
                },
                None,
            )
            .await?;
        Ok(to_tx_receipt(&receipt))
    }
}
