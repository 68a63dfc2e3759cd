//! Read-only chain client used by the resolvers.
//!
//! Blocks, transactions and receipts are fetched with raw JSON-RPC calls and
//! only the fields the resolvers need are typed. Blocks are passed through
//! verbatim, and a receipt without `status` stays distinguishable from a
//! failed one.

use std::fmt;

use alloy::network::Ethereum;
use alloy::primitives::{Address, B256, U64, U256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::{Filter, Log};
use serde::Deserialize;
use serde_json::Value;

use crate::chain::ChainKey;
use crate::contracts::IZylToken;
use crate::error::ExplorerError;

/// Fields of `eth_getTransactionByHash` the transaction resolver reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcTransaction {
    pub hash: B256,
    pub from: Address,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub block_number: Option<U64>,
}

/// Fields of `eth_getTransactionReceipt` the transaction resolver reads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    #[serde(default)]
    pub status: Option<U64>,
    #[serde(default)]
    pub block_number: Option<U64>,
    #[serde(default)]
    pub gas_used: Option<U256>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

/// Snapshot taken by the connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub block_number: u64,
    pub chain_id: u64,
    pub gas_price: u128,
}

#[derive(Clone)]
pub struct ChainReader {
    chain: ChainKey,
    provider: RootProvider<Ethereum>,
}

impl fmt::Debug for ChainReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainReader")
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl ChainReader {
    pub fn new(chain: ChainKey, provider: RootProvider<Ethereum>) -> Self {
        Self { chain, provider }
    }

    pub fn chain(&self) -> ChainKey {
        self.chain
    }

    pub async fn block_number(&self) -> Result<u64, ExplorerError> {
        Ok(self.provider.get_block_number().await?)
    }

    /// Native balance in wei.
    pub async fn balance(&self, address: Address) -> Result<U256, ExplorerError> {
        Ok(self.provider.get_balance(address).await?)
    }

    pub async fn logs(&self, filter: &Filter) -> Result<Vec<Log>, ExplorerError> {
        Ok(self.provider.get_logs(filter).await?)
    }

    /// Raw block JSON with full transaction bodies, `None` if the node has no
    /// such block.
    pub async fn block_with_transactions(&self, number: u64) -> Result<Option<Value>, ExplorerError> {
        let block: Option<Value> = self
            .provider
            .raw_request(
                "eth_getBlockByNumber".into(),
                (format!("0x{number:x}"), true),
            )
            .await?;
        Ok(block.filter(|b| !b.is_null()))
    }

    pub async fn transaction(&self, hash: B256) -> Result<Option<RpcTransaction>, ExplorerError> {
        Ok(self
            .provider
            .raw_request("eth_getTransactionByHash".into(), (hash,))
            .await?)
    }

    pub async fn receipt(&self, hash: B256) -> Result<Option<RpcReceipt>, ExplorerError> {
        Ok(self
            .provider
            .raw_request("eth_getTransactionReceipt".into(), (hash,))
            .await?)
    }

    pub async fn token_balance(&self, token: Address, owner: Address) -> Result<U256, ExplorerError> {
        let contract = IZylToken::new(token, &self.provider);
        Ok(contract.balanceOf(owner).call().await?)
    }

    pub async fn token_decimals(&self, token: Address) -> Result<u8, ExplorerError> {
        let contract = IZylToken::new(token, &self.provider);
        Ok(contract.decimals().call().await?)
    }

    /// Latest block, then chain id and gas price concurrently.
    pub async fn probe(&self) -> Result<ProbeReport, ExplorerError> {
        let block_number = self.provider.get_block_number().await?;
        let (chain_id, gas_price) =
            futures::try_join!(self.provider.get_chain_id(), self.provider.get_gas_price())?;
        Ok(ProbeReport {
            block_number,
            chain_id,
            gas_price,
        })
    }
}
