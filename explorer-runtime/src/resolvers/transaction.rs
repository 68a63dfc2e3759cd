use alloy::primitives::B256;

use crate::chain::ChainKey;
use crate::decoder::DecoderSet;
use crate::error::ExplorerError;
use crate::provider::ProviderFactory;
use crate::query;
use crate::types::{DecodedEvent, TransactionSummary, TxStatus};

/// Transaction `hash` with its receipt's logs decoded against the bridge,
/// token and router interfaces.
pub async fn transaction(
    providers: &ProviderFactory,
    chain: ChainKey,
    hash: &str,
) -> Result<TransactionSummary, ExplorerError> {
    if !query::is_tx_hash(hash) {
        return Err(ExplorerError::invalid("Invalid transaction hash"));
    }
    let tx_hash: B256 = hash
        .parse()
        .map_err(|_| ExplorerError::invalid("Invalid transaction hash"))?;

    let reader = providers.connect(chain)?;
    tracing::info!(%chain, %tx_hash, "fetching transaction");

    let (tx, receipt) = futures::try_join!(reader.transaction(tx_hash), reader.receipt(tx_hash))?;
    let tx = tx.ok_or_else(|| ExplorerError::TransactionNotFound(hash.to_string()))?;

    let decoders = DecoderSet::known_contracts()?;
    let (status, block, gas_used, events) = match &receipt {
        Some(receipt) => {
            let events: Vec<DecodedEvent> = decoders
                .decode_all(&receipt.logs)
                .iter()
                .map(DecodedEvent::from)
                .collect();
            tracing::debug!(
                %tx_hash,
                logs = receipt.logs.len(),
                decoded = events.len(),
                "receipt logs decoded"
            );
            let status = TxStatus::from_receipt_status(receipt.status.map(|s| s.to::<u64>()));
            let block = match status {
                TxStatus::Pending => None,
                _ => receipt.block_number.map(|n| n.to::<u64>()),
            };
            (status, block, receipt.gas_used.map(|g| g.to_string()), events)
        }
        None => (TxStatus::Pending, None, None, Vec::new()),
    };

    Ok(TransactionSummary {
        status,
        block,
        from: tx.from.to_checksum(None),
        to: tx.to.map(|to| to.to_checksum(None)),
        gas_used,
        events,
        tx_hash: hash.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::{Address, U256, address};
    use alloy::sol_types::SolEvent;
    use serde_json::{Value, json};

    use super::*;
    use crate::config::ExplorerConfig;
    use crate::contracts::IZylToken;
    use crate::testing::{RpcMock, rpc_log};

    const FROM: Address = address!("1111111111111111111111111111111111111111");
    const TO: Address = address!("2222222222222222222222222222222222222222");

    fn factory_for(uri: &str) -> ProviderFactory {
        let config = ExplorerConfig::default().with_endpoint(ChainKey::ArbitrumSepolia, None, Some(uri));
        ProviderFactory::new(Arc::new(config))
    }

    fn hash() -> B256 {
        B256::repeat_byte(0x42)
    }

    fn tx_json() -> Value {
        json!({
            "hash": hash(),
            "from": FROM,
            "to": TO,
            "blockNumber": "0x64",
            "nonce": "0x1",
            "value": "0x0"
        })
    }

    fn receipt_json(status: Option<&str>, logs: Vec<Value>) -> Value {
        let mut receipt = json!({
            "transactionHash": hash(),
            "blockNumber": "0x64",
            "gasUsed": "0xffffffffffffffffff",
            "logs": logs
        });
        if let Some(status) = status {
            receipt["status"] = json!(status);
        }
        receipt
    }

    fn token_transfer_log() -> Value {
        rpc_log(
            crate::chain::ZYL_TOKEN,
            &[IZylToken::Transfer::SIGNATURE_HASH, FROM.into_word(), TO.into_word()],
            &U256::from(u64::MAX).to_be_bytes::<32>(),
            100,
            hash(),
            4,
        )
    }

    fn unknown_log() -> Value {
        rpc_log(Address::ZERO, &[B256::repeat_byte(0x99)], &[], 100, hash(), 5)
    }

    #[tokio::test]
    async fn test_invalid_hash_is_rejected() {
        let factory = factory_for("http://127.0.0.1:1");
        for bad in ["0x1234", "not-a-hash", format!("0x{}", "zz".repeat(32)).as_str()] {
            let err = transaction(&factory, ChainKey::ArbitrumSepolia, bad)
                .await
                .unwrap_err();
            assert!(matches!(err, ExplorerError::InvalidInput(_)), "{bad}");
        }
    }

    #[tokio::test]
    async fn test_successful_transaction_with_decoded_events() {
        let server = RpcMock::new()
            .result("eth_getTransactionByHash", tx_json())
            .result(
                "eth_getTransactionReceipt",
                receipt_json(Some("0x1"), vec![token_transfer_log(), unknown_log()]),
            )
            .start()
            .await;

        let summary = transaction(&factory_for(&server.uri()), ChainKey::ArbitrumSepolia, &hash().to_string())
            .await
            .unwrap();

        assert_eq!(summary.status, TxStatus::Success);
        assert_eq!(summary.block, Some(100));
        assert_eq!(summary.from, FROM.to_checksum(None));
        assert_eq!(summary.to, Some(TO.to_checksum(None)));
        assert_eq!(summary.gas_used.as_deref(), Some("4722366482869645213695"));
        assert_eq!(summary.tx_hash, hash().to_string());

        // Unknown log silently omitted
        assert_eq!(summary.events.len(), 1);
        let event = &summary.events[0];
        assert_eq!(event.event, "Transfer");
        assert_eq!(event.log_index, Some(4));
        assert_eq!(event.args["value"], "18446744073709551615");
        assert_eq!(event.args["from"], FROM.to_checksum(None));
    }

    #[tokio::test]
    async fn test_failed_and_pending_status() {
        let failed = RpcMock::new()
            .result("eth_getTransactionByHash", tx_json())
            .result("eth_getTransactionReceipt", receipt_json(Some("0x0"), vec![]))
            .start()
            .await;
        let summary = transaction(&factory_for(&failed.uri()), ChainKey::ArbitrumSepolia, &hash().to_string())
            .await
            .unwrap();
        assert_eq!(summary.status, TxStatus::Failed);

        let no_status = RpcMock::new()
            .result("eth_getTransactionByHash", tx_json())
            .result("eth_getTransactionReceipt", receipt_json(None, vec![]))
            .start()
            .await;
        let summary = transaction(&factory_for(&no_status.uri()), ChainKey::ArbitrumSepolia, &hash().to_string())
            .await
            .unwrap();
        assert_eq!(summary.status, TxStatus::Pending);
        assert_eq!(summary.block, None);

        let no_receipt = RpcMock::new()
            .result("eth_getTransactionByHash", tx_json())
            .result("eth_getTransactionReceipt", Value::Null)
            .start()
            .await;
        let summary = transaction(&factory_for(&no_receipt.uri()), ChainKey::ArbitrumSepolia, &hash().to_string())
            .await
            .unwrap();
        assert_eq!(summary.status, TxStatus::Pending);
        assert!(summary.events.is_empty());
    }

    #[tokio::test]
    async fn test_missing_transaction_is_not_found() {
        let server = RpcMock::new()
            .result("eth_getTransactionByHash", Value::Null)
            .result("eth_getTransactionReceipt", Value::Null)
            .start()
            .await;

        let err = transaction(&factory_for(&server.uri()), ChainKey::ArbitrumSepolia, &hash().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::TransactionNotFound(_)));
    }
}
