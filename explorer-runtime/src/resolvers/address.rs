use alloy::primitives::{Address, U256};
use alloy::rpc::types::Filter;
use alloy::sol_types::SolEvent;

use crate::chain::ChainKey;
use crate::contracts::{IZylToken, KnownContract};
use crate::decoder::AbiDecoder;
use crate::error::ExplorerError;
use crate::json::{format_ether, format_units};
use crate::provider::ProviderFactory;
use crate::query;
use crate::types::{AddressSummary, TransferRecord};

use super::{arg_string, window_start};

/// Blocks searched back from the latest for token transfers.
pub const TRANSFER_WINDOW: u64 = 25_000;

/// Most recent transfers kept in a response.
pub const MAX_TRANSFERS: usize = 100;

const DEFAULT_DECIMALS: u8 = 18;

pub async fn address_summary(
    providers: &ProviderFactory,
    chain: ChainKey,
    address: &str,
) -> Result<AddressSummary, ExplorerError> {
    if !query::is_address(address) {
        return Err(ExplorerError::invalid("Invalid address"));
    }
    let owner: Address = address
        .parse()
        .map_err(|_| ExplorerError::invalid("Invalid address"))?;

    let reader = providers.connect(chain)?;
    let token = chain.config().token;
    tracing::info!(%chain, %owner, %token, "fetching address data");

    let (balance, token_balance, decimals, latest) = futures::join!(
        reader.balance(owner),
        reader.token_balance(token, owner),
        reader.token_decimals(token),
        reader.block_number(),
    );
    let balance = balance?;
    let latest = latest?;
    let token_balance = token_balance.unwrap_or_else(|e| {
        tracing::warn!(%chain, %owner, error = %e, "token balance unavailable, using 0");
        U256::ZERO
    });
    let decimals = decimals.unwrap_or_else(|e| {
        tracing::warn!(%chain, %token, error = %e, "token decimals unavailable, using 18");
        DEFAULT_DECIMALS
    });

    let from_block = window_start(latest, TRANSFER_WINDOW);
    let base = Filter::new()
        .address(token)
        .event_signature(IZylToken::Transfer::SIGNATURE_HASH)
        .from_block(from_block)
        .to_block(latest);
    let sent = base.clone().topic1(owner.into_word());
    let received = base.topic2(owner.into_word());

    let (sent, received) = futures::try_join!(reader.logs(&sent), reader.logs(&received))?;
    tracing::info!(
        %chain,
        %owner,
        from_block,
        to_block = latest,
        sent = sent.len(),
        received = received.len(),
        "transfer logs fetched"
    );

    let mut logs = sent;
    logs.extend(received);
    logs.sort_by_key(|log| log.block_number.unwrap_or_default());

    let decoder = AbiDecoder::for_contract(KnownContract::Token)?;
    let mut transfers: Vec<TransferRecord> = logs
        .iter()
        .filter_map(|log| match decoder.decode_log(log) {
            Ok(decoded) => {
                let amount = match decoded.arg("value", 2)? {
                    alloy::dyn_abi::DynSolValue::Uint(v, _) => *v,
                    _ => return None,
                };
                Some(TransferRecord {
                    tx_hash: decoded.transaction_hash.map(|h| h.to_string()),
                    block: decoded.block_number,
                    from: arg_string(decoded.arg("from", 0)?)?,
                    to: arg_string(decoded.arg("to", 1)?)?,
                    amount: amount.to_string(),
                    human: format_units(amount, decimals),
                })
            }
            Err(e) => {
                tracing::debug!(%chain, error = %e, "dropping undecodable transfer log");
                None
            }
        })
        .collect();

    if transfers.len() > MAX_TRANSFERS {
        transfers.drain(..transfers.len() - MAX_TRANSFERS);
    }

    Ok(AddressSummary {
        chain,
        address: address.to_string(),
        eth_balance: format_ether(balance),
        zyl_balance: format_units(token_balance, decimals),
        transfers,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alloy::primitives::{B256, address};
    use alloy::sol_types::SolCall;
    use serde_json::{Value, json};

    use super::*;
    use crate::config::ExplorerConfig;
    use crate::testing::{RpcMock, encode_uint, quantity, rpc_log};

    const OWNER: Address = address!("1111111111111111111111111111111111111111");
    const PEER: Address = address!("2222222222222222222222222222222222222222");

    fn factory_for(uri: &str) -> ProviderFactory {
        let config = ExplorerConfig::default().with_endpoint(ChainKey::ArbitrumSepolia, None, Some(uri));
        ProviderFactory::new(Arc::new(config))
    }

    fn transfer(from: Address, to: Address, amount: u64, block: u64, tx_byte: u8) -> Value {
        rpc_log(
            crate::chain::ZYL_TOKEN,
            &[
                IZylToken::Transfer::SIGNATURE_HASH,
                from.into_word(),
                to.into_word(),
            ],
            &U256::from(amount).to_be_bytes::<32>(),
            block,
            B256::repeat_byte(tx_byte),
            0,
        )
    }

    fn one_ether() -> U256 {
        U256::from(10u64).pow(U256::from(18u64))
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected_before_connecting() {
        // No endpoint reachable: validation must fail first
        let factory = factory_for("http://127.0.0.1:1");
        let err = address_summary(&factory, ChainKey::ArbitrumSepolia, "not-an-address")
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::InvalidInput(ref m) if m == "Invalid address"));
    }

    #[tokio::test]
    async fn test_address_summary_merges_and_sorts_transfers() {
        let server = RpcMock::new()
            .result("eth_getBalance", json!(quantity(2_000_000_000_000_000_000)))
            .block_number(100_000)
            .call_result(IZylToken::balanceOfCall::SELECTOR, encode_uint(U256::from(1_500_000u64)))
            .call_result(IZylToken::decimalsCall::SELECTOR, encode_uint(U256::from(6u64)))
            .logs_for_topic(1, OWNER.into_word(), vec![transfer(OWNER, PEER, 250_000, 90_000, 0xa1)])
            .logs_for_topic(2, OWNER.into_word(), vec![transfer(PEER, OWNER, 1_000_000, 80_000, 0xa2)])
            .start()
            .await;

        let factory = factory_for(&server.uri());
        let summary = address_summary(&factory, ChainKey::ArbitrumSepolia, &OWNER.to_string())
            .await
            .unwrap();

        assert_eq!(summary.eth_balance, "2.0");
        assert_eq!(summary.zyl_balance, "1.5");
        assert_eq!(summary.transfers.len(), 2);
        // Ascending by block: the received transfer came first
        assert_eq!(summary.transfers[0].block, Some(80_000));
        assert_eq!(summary.transfers[0].from, PEER.to_checksum(None));
        assert_eq!(summary.transfers[0].human, "1");
        assert_eq!(summary.transfers[1].amount, "250000");
        assert_eq!(summary.transfers[1].human, "0.25");
        assert_eq!(
            summary.transfers[1].tx_hash.as_deref(),
            Some(B256::repeat_byte(0xa1).to_string().as_str())
        );
    }

    #[tokio::test]
    async fn test_decimals_revert_falls_back_to_18() {
        let server = RpcMock::new()
            .result("eth_getBalance", json!("0x0"))
            .block_number(10)
            .call_result(IZylToken::balanceOfCall::SELECTOR, encode_uint(one_ether() * U256::from(3u64)))
            .call_revert(IZylToken::decimalsCall::SELECTOR)
            .start()
            .await;

        let factory = factory_for(&server.uri());
        let summary = address_summary(&factory, ChainKey::ArbitrumSepolia, &OWNER.to_string())
            .await
            .unwrap();
        assert_eq!(summary.zyl_balance, "3");
        assert_eq!(summary.eth_balance, "0.0");
        assert!(summary.transfers.is_empty());
    }

    #[tokio::test]
    async fn test_balance_revert_falls_back_to_zero() {
        let server = RpcMock::new()
            .result("eth_getBalance", json!("0x0"))
            .block_number(10)
            .call_revert(IZylToken::balanceOfCall::SELECTOR)
            .call_result(IZylToken::decimalsCall::SELECTOR, encode_uint(U256::from(18u64)))
            .start()
            .await;

        let factory = factory_for(&server.uri());
        let summary = address_summary(&factory, ChainKey::ArbitrumSepolia, &OWNER.to_string())
            .await
            .unwrap();
        assert_eq!(summary.zyl_balance, "0");
    }

    #[tokio::test]
    async fn test_transfers_capped_to_most_recent() {
        let received: Vec<Value> = (0..(MAX_TRANSFERS as u64 + 20))
            .map(|i| transfer(PEER, OWNER, i + 1, 1_000 + i, 0x10))
            .collect();
        let server = RpcMock::new()
            .result("eth_getBalance", json!("0x0"))
            .block_number(5_000)
            .call_result(IZylToken::balanceOfCall::SELECTOR, encode_uint(U256::ZERO))
            .call_result(IZylToken::decimalsCall::SELECTOR, encode_uint(U256::from(0u64)))
            .logs_for_topic(2, OWNER.into_word(), received)
            .start()
            .await;

        let factory = factory_for(&server.uri());
        let summary = address_summary(&factory, ChainKey::ArbitrumSepolia, &OWNER.to_string())
            .await
            .unwrap();
        assert_eq!(summary.transfers.len(), MAX_TRANSFERS);
        assert_eq!(summary.transfers[0].block, Some(1_020));
        assert_eq!(summary.transfers[MAX_TRANSFERS - 1].block, Some(1_119));
    }

    #[tokio::test]
    async fn test_log_query_failure_is_fatal() {
        let server = RpcMock::new()
            .result("eth_getBalance", json!("0x0"))
            .block_number(5_000)
            .error("eth_getLogs", "query returned more than 10000 results")
            .start()
            .await;

        let factory = factory_for(&server.uri());
        let err = address_summary(&factory, ChainKey::ArbitrumSepolia, &OWNER.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, ExplorerError::Upstream(_)));
    }
}
