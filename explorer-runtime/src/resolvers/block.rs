use chrono::Utc;
use serde_json::Value;

use crate::chain::ChainKey;
use crate::error::ExplorerError;
use crate::json::{self, rewrite_quantities};
use crate::provider::ProviderFactory;
use crate::query;
use crate::types::{BlockResponse, LatestBlock};

/// Block header fields carrying hex quantities.
pub const BLOCK_QUANTITY_FIELDS: &[&str] = &[
    "number",
    "gasLimit",
    "gasUsed",
    "timestamp",
    "baseFeePerGas",
    "difficulty",
    "totalDifficulty",
    "size",
    "blobGasUsed",
    "excessBlobGas",
    "l1BlockNumber",
];

/// Transaction fields carrying hex quantities.
pub const TX_QUANTITY_FIELDS: &[&str] = &[
    "blockNumber",
    "chainId",
    "gas",
    "gasPrice",
    "maxFeePerGas",
    "maxPriorityFeePerGas",
    "maxFeePerBlobGas",
    "nonce",
    "transactionIndex",
    "type",
    "v",
    "value",
    "yParity",
];

/// Parse the `{num}` path segment: decimal digits only.
pub fn parse_block_param(raw: &str) -> Result<u64, ExplorerError> {
    query::parse_block_number(raw.trim()).ok_or_else(|| ExplorerError::invalid("Invalid block number"))
}

/// Block `number` with full transaction bodies.
pub async fn block(
    providers: &ProviderFactory,
    chain: ChainKey,
    number: u64,
) -> Result<BlockResponse, ExplorerError> {
    let reader = providers.connect(chain)?;
    tracing::info!(%chain, block = number, "fetching block");

    let mut block = reader
        .block_with_transactions(number)
        .await?
        .ok_or(ExplorerError::BlockNotFound(number))?;

    rewrite_quantities(&mut block, BLOCK_QUANTITY_FIELDS);
    if let Some(Value::Array(txs)) = block.get_mut("transactions") {
        for tx in txs.iter_mut() {
            rewrite_quantities(tx, TX_QUANTITY_FIELDS);
        }
    }
    json::normalize(&mut block);

    Ok(BlockResponse { chain, block })
}

pub async fn latest_block(
    providers: &ProviderFactory,
    chain: ChainKey,
) -> Result<LatestBlock, ExplorerError> {
    let reader = providers.connect(chain)?;
    let number = reader.block_number().await?;
    tracing::debug!(%chain, block = number, "latest block");

    Ok(LatestBlock {
        chain,
        latest_block: number.to_string(),
        timestamp: Utc::now().timestamp_millis(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::config::ExplorerConfig;
    use crate::testing::RpcMock;

    fn factory_for(uri: &str) -> ProviderFactory {
        let config = ExplorerConfig::default().with_endpoint(ChainKey::ArbitrumSepolia, None, Some(uri));
        ProviderFactory::new(Arc::new(config))
    }

    fn sample_block() -> Value {
        json!({
            "number": "0x1b4",
            "hash": format!("0x{}", "ab".repeat(32)),
            "gasLimit": "0x1c9c380",
            "gasUsed": "0x5208",
            "timestamp": "0x6553f100",
            "baseFeePerGas": "0xffffffffffffffffffff",
            "miner": "0x0000000000000000000000000000000000000000",
            "transactions": [{
                "hash": format!("0x{}", "cd".repeat(32)),
                "value": "0xffffffffffffffff",
                "nonce": "0x2",
                "input": "0x"
            }]
        })
    }

    #[test]
    fn test_parse_block_param() {
        assert_eq!(parse_block_param("42161").unwrap(), 42161);
        for bad in ["-1", "abc", "1.5", "", "0x10"] {
            let err = parse_block_param(bad).unwrap_err();
            assert!(matches!(err, ExplorerError::InvalidInput(ref m) if m == "Invalid block number"));
        }
    }

    #[tokio::test]
    async fn test_block_quantities_become_decimal_strings() {
        let server = RpcMock::new()
            .result("eth_getBlockByNumber", sample_block())
            .start()
            .await;

        let response = block(&factory_for(&server.uri()), ChainKey::ArbitrumSepolia, 436)
            .await
            .unwrap();
        let block = &response.block;
        assert_eq!(block["number"], "436");
        assert_eq!(block["gasUsed"], "21000");
        assert_eq!(block["baseFeePerGas"], "1208925819614629174706175");
        // Non-quantity fields pass through verbatim
        assert_eq!(block["miner"], "0x0000000000000000000000000000000000000000");
        assert_eq!(block["transactions"][0]["value"], "18446744073709551615");
        assert_eq!(block["transactions"][0]["nonce"], "2");
        assert_eq!(block["transactions"][0]["input"], "0x");
    }

    #[tokio::test]
    async fn test_block_fetch_is_idempotent() {
        let server = RpcMock::new()
            .result("eth_getBlockByNumber", sample_block())
            .start()
            .await;
        let factory = factory_for(&server.uri());

        let first = block(&factory, ChainKey::ArbitrumSepolia, 436).await.unwrap();
        let second = block(&factory, ChainKey::ArbitrumSepolia, 436).await.unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_block_is_not_found() {
        let server = RpcMock::new()
            .result("eth_getBlockByNumber", Value::Null)
            .start()
            .await;

        let err = block(&factory_for(&server.uri()), ChainKey::ArbitrumSepolia, 99_999_999_999)
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::BlockNotFound(99_999_999_999)));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_latest_block() {
        let server = RpcMock::new().block_number(0x1234).start().await;

        let latest = latest_block(&factory_for(&server.uri()), ChainKey::ArbitrumSepolia)
            .await
            .unwrap();
        assert_eq!(latest.latest_block, "4660");
        assert!(latest.timestamp > 0);
    }
}
