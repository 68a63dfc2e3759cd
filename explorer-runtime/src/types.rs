use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chain::ChainKey;
use crate::decoder::DecodedLog;

/// A receipt log decoded against one of the known interfaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedEvent {
    pub address: String,
    pub event: String,
    /// Declaration order (serde_json `preserve_order`).
    pub args: Map<String, Value>,
    pub log_index: Option<u64>,
}

impl From<&DecodedLog> for DecodedEvent {
    fn from(log: &DecodedLog) -> Self {
        Self {
            address: log.address.to_checksum(None),
            event: log.event.clone(),
            args: log.args_json(),
            log_index: log.log_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub tx_hash: Option<String>,
    pub block: Option<u64>,
    pub from: String,
    pub to: String,
    /// Raw token amount as a decimal string.
    pub amount: String,
    /// `amount / 10^decimals`.
    pub human: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSummary {
    pub chain: ChainKey,
    pub address: String,
    pub eth_balance: String,
    pub zyl_balance: String,
    pub transfers: Vec<TransferRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockResponse {
    pub chain: ChainKey,
    pub block: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlock {
    pub chain: ChainKey,
    pub latest_block: String,
    /// Unix milliseconds at which the number was read.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Success,
    Failed,
}

impl TxStatus {
    /// No status field means the receipt is not final yet.
    pub fn from_receipt_status(status: Option<u64>) -> Self {
        match status {
            None => TxStatus::Pending,
            Some(1) => TxStatus::Success,
            Some(_) => TxStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub status: TxStatus,
    pub block: Option<u64>,
    pub from: String,
    pub to: Option<String>,
    pub gas_used: Option<String>,
    pub events: Vec<DecodedEvent>,
    pub tx_hash: String,
}

/// Status tag of a bridge event. Event names outside the two known ones are
/// passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeStatus {
    Initiated,
    Received,
    Other(String),
}

impl BridgeStatus {
    pub fn from_event_name(name: &str) -> Self {
        match name {
            "BridgeInitiated" => BridgeStatus::Initiated,
            "MessageReceived" => BridgeStatus::Received,
            other => BridgeStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BridgeStatus::Initiated => "initiated",
            BridgeStatus::Received => "received",
            BridgeStatus::Other(name) => name,
        }
    }
}

impl Serialize for BridgeStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BridgeEventDetail {
    Transfer {
        from: Option<String>,
        to: Option<String>,
        token: Option<String>,
        amount: Option<String>,
    },
    Unknown {
        #[serde(rename = "rawArgs")]
        raw_args: Map<String, Value>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeEventRecord {
    pub tx_hash: Option<String>,
    pub chain: ChainKey,
    #[serde(flatten)]
    pub detail: BridgeEventDetail,
    pub status: BridgeStatus,
}
