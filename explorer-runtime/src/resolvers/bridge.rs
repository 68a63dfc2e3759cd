use alloy::rpc::types::{Filter, Log};

use crate::chain::ChainKey;
use crate::contracts::KnownContract;
use crate::decoder::{AbiDecoder, DecodedLog};
use crate::error::ExplorerError;
use crate::provider::ProviderFactory;
use crate::reader::ChainReader;
use crate::types::{BridgeEventDetail, BridgeEventRecord, BridgeStatus};

use super::{arg_string, window_start};

/// Blocks searched back from the latest for bridge events.
pub const BRIDGE_WINDOW: u64 = 50_000;

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 200;

const INITIATED_EVENT: &str = "BridgeInitiated";
const RECEIVED_EVENT: &str = "MessageReceived";

/// Parse the `limit` query value, clamped to `1..=MAX_LIMIT`. Missing or
/// non-numeric values use the default.
pub fn clamp_limit(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim) else {
        return DEFAULT_LIMIT;
    };
    match raw.parse::<i64>() {
        Ok(n) => n.clamp(1, MAX_LIMIT as i64) as usize,
        Err(_) => DEFAULT_LIMIT,
    }
}

/// Most recent bridge events on `chain`, newest first.
pub async fn recent_bridge_events(
    providers: &ProviderFactory,
    chain: ChainKey,
    limit: usize,
) -> Result<Vec<BridgeEventRecord>, ExplorerError> {
    let limit = limit.clamp(1, MAX_LIMIT);
    let reader = providers.connect(chain)?;
    let bridge = chain.config().bridge;

    let decoder = AbiDecoder::for_contract(KnownContract::Bridge)?;
    let initiated = decoder
        .selector(INITIATED_EVENT)
        .ok_or_else(|| ExplorerError::MalformedAbi(format!("bridge ABI lacks {INITIATED_EVENT}")))?;
    let received = decoder
        .selector(RECEIVED_EVENT)
        .ok_or_else(|| ExplorerError::MalformedAbi(format!("bridge ABI lacks {RECEIVED_EVENT}")))?;

    let latest = reader.block_number().await?;
    let from_block = window_start(latest, BRIDGE_WINDOW);
    let base = Filter::new().address(bridge).from_block(from_block).to_block(latest);

    let (initiated_logs, received_logs) = futures::join!(
        logs_or_empty(&reader, base.clone().event_signature(initiated), INITIATED_EVENT),
        logs_or_empty(&reader, base.event_signature(received), RECEIVED_EVENT),
    );
    tracing::info!(
        %chain,
        from_block,
        to_block = latest,
        initiated = initiated_logs.len(),
        received = received_logs.len(),
        limit,
        "bridge logs fetched"
    );

    let mut logs = initiated_logs;
    logs.extend(received_logs);
    let start = logs.len().saturating_sub(limit);
    let records = logs[start..]
        .iter()
        .rev()
        .filter_map(|log| match decoder.decode_log(log) {
            Ok(decoded) => Some(to_record(chain, &decoded)),
            Err(e) => {
                tracing::debug!(%chain, error = %e, "dropping undecodable bridge log");
                None
            }
        })
        .collect();

    Ok(records)
}

/// A failed filter degrades to no events for that filter only.
async fn logs_or_empty(reader: &ChainReader, filter: Filter, event: &str) -> Vec<Log> {
    reader.logs(&filter).await.unwrap_or_else(|e| {
        tracing::warn!(chain = %reader.chain(), event, error = %e, "bridge log query failed");
        Vec::new()
    })
}

fn to_record(chain: ChainKey, decoded: &DecodedLog) -> BridgeEventRecord {
    let status = BridgeStatus::from_event_name(&decoded.event);
    let detail = match status {
        BridgeStatus::Initiated | BridgeStatus::Received => {
            let arg = |name: &str, position: usize| decoded.arg(name, position).and_then(arg_string);
            BridgeEventDetail::Transfer {
                from: arg("from", 0),
                to: arg("to", 1),
                token: arg("token", 2),
                amount: Some(arg("amount", 3).unwrap_or_default()),
            }
        }
        BridgeStatus::Other(_) => {
            tracing::debug!(%chain, event = %decoded.event, "unmapped bridge event");
            BridgeEventDetail::Unknown {
                raw_args: decoded.args_json(),
            }
        }
    };

    BridgeEventRecord {
        tx_hash: decoded.transaction_hash.map(|h| h.to_string()),
        chain,
        detail,
        status,
    }
}
