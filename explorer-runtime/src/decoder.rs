//! ABI-guided event log decoding.
//!
//! Each [`LogDecoder`] knows one contract interface. A [`DecoderSet`] tries
//! its decoders in order and keeps the first success, so adding a contract
//! type means appending a decoder rather than branching on contract identity.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use alloy::dyn_abi::{DynSolValue, EventExt};
use alloy::json_abi::{Event, JsonAbi};
use alloy::primitives::{Address, B256};
use alloy::rpc::types::Log;
use serde_json::{Map, Value};

use crate::contracts::KnownContract;
use crate::error::ExplorerError;

/// Decoders for the embedded fixtures, parsed on first use. The error is kept
/// as text since `ExplorerError` is not `Clone`.
static KNOWN_DECODERS: LazyLock<Result<Vec<(KnownContract, Arc<AbiDecoder>)>, String>> =
    LazyLock::new(|| {
        KnownContract::DECODE_ORDER
            .into_iter()
            .map(|contract| {
                let abi = contract.abi().map_err(|e| e.to_string())?;
                Ok((contract, Arc::new(AbiDecoder::new(contract.name(), &abi))))
            })
            .collect()
    });

/// One event log decoded against an ABI.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLog {
    pub address: Address,
    pub event: String,
    /// Arguments in declaration order. Unnamed inputs are keyed by position.
    pub params: Vec<(String, DynSolValue)>,
    pub log_index: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub block_number: Option<u64>,
}

impl DecodedLog {
    /// Argument by name, falling back to declaration position.
    pub fn arg(&self, name: &str, position: usize) -> Option<&DynSolValue> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .or_else(|| self.params.get(position))
            .map(|(_, v)| v)
    }

    pub fn args_json(&self) -> Map<String, Value> {
        self.params
            .iter()
            .map(|(name, value)| (name.clone(), value_to_json(value)))
            .collect()
    }
}

pub trait LogDecoder: Send + Sync {
    fn name(&self) -> &str;

    /// `None` when the log does not belong to this interface or its payload
    /// does not match the event definition.
    fn decode(&self, log: &Log) -> Option<DecodedLog>;
}

/// Decoder for a single parsed ABI, with events indexed by topic-0 selector.
#[derive(Debug, Clone)]
pub struct AbiDecoder {
    name: String,
    events: HashMap<B256, Event>,
}

impl AbiDecoder {
    pub fn new(name: impl Into<String>, abi: &JsonAbi) -> Self {
        let events = abi
            .events()
            .filter(|event| !event.anonymous)
            .map(|event| (event.selector(), event.clone()))
            .collect();
        Self {
            name: name.into(),
            events,
        }
    }

    /// Shared decoder for one of the embedded contract fixtures.
    pub fn for_contract(contract: KnownContract) -> Result<Arc<Self>, ExplorerError> {
        let decoders = KNOWN_DECODERS
            .as_ref()
            .map_err(|e| ExplorerError::MalformedAbi(e.clone()))?;
        decoders
            .iter()
            .find(|(known, _)| *known == contract)
            .map(|(_, decoder)| Arc::clone(decoder))
            .ok_or_else(|| ExplorerError::MalformedAbi(format!("no decoder for {}", contract.name())))
    }

    /// Topic-0 selector of the named event, if the ABI declares it.
    pub fn selector(&self, event_name: &str) -> Option<B256> {
        self.events
            .iter()
            .find(|(_, event)| event.name == event_name)
            .map(|(selector, _)| *selector)
    }

    pub fn decode_log(&self, log: &Log) -> Result<DecodedLog, ExplorerError> {
        let topic0 = log
            .topics()
            .first()
            .ok_or_else(|| ExplorerError::Decode("log has no topics".into()))?;
        let event = self
            .events
            .get(topic0)
            .ok_or_else(|| ExplorerError::Decode(format!("unknown event {topic0}")))?;

        let decoded = event.decode_log_parts(log.topics().iter().copied(), &log.data().data)?;

        // Indexed and body values come back separately; re-interleave them in
        // declaration order.
        let mut indexed = decoded.indexed.into_iter();
        let mut body = decoded.body.into_iter();
        let mut params = Vec::with_capacity(event.inputs.len());
        for (position, input) in event.inputs.iter().enumerate() {
            let value = if input.indexed {
                indexed.next()
            } else {
                body.next()
            };
            let value = value.ok_or_else(|| {
                ExplorerError::Decode(format!("{}: missing value for input {position}", event.name))
            })?;
            let name = if input.name.is_empty() {
                position.to_string()
            } else {
                input.name.clone()
            };
            params.push((name, value));
        }

        Ok(DecodedLog {
            address: log.address(),
            event: event.name.clone(),
            params,
            log_index: log.log_index,
            transaction_hash: log.transaction_hash,
            block_number: log.block_number,
        })
    }
}

impl<T: LogDecoder + ?Sized> LogDecoder for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn decode(&self, log: &Log) -> Option<DecodedLog> {
        (**self).decode(log)
    }
}

impl LogDecoder for AbiDecoder {
    fn name(&self) -> &str {
        &self.name
    }

    fn decode(&self, log: &Log) -> Option<DecodedLog> {
        self.decode_log(log).ok()
    }
}

/// Ordered decoders; the first one that recognizes a log wins.
#[derive(Default)]
pub struct DecoderSet {
    decoders: Vec<Box<dyn LogDecoder>>,
}

impl DecoderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, decoder: impl LogDecoder + 'static) -> Self {
        self.decoders.push(Box::new(decoder));
        self
    }

    /// Bridge, token and router interfaces, in that order.
    pub fn known_contracts() -> Result<Self, ExplorerError> {
        KnownContract::DECODE_ORDER
            .into_iter()
            .try_fold(Self::new(), |set, contract| {
                Ok(set.with(AbiDecoder::for_contract(contract)?))
            })
    }

    pub fn len(&self) -> usize {
        self.decoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decoders.is_empty()
    }

    pub fn decode(&self, log: &Log) -> Option<DecodedLog> {
        let decoded = self.decoders.iter().find_map(|d| d.decode(log));
        if decoded.is_none() {
            tracing::debug!(
                address = %log.address(),
                topic0 = ?log.topics().first(),
                "log matched no known interface"
            );
        }
        decoded
    }

    /// Decode every log, silently omitting the ones no decoder recognizes.
    pub fn decode_all<'a>(&self, logs: impl IntoIterator<Item = &'a Log>) -> Vec<DecodedLog> {
        logs.into_iter().filter_map(|log| self.decode(log)).collect()
    }
}

/// Render a decoded ABI value as JSON. Integers become decimal strings so
/// values wider than 53 bits survive.
pub fn value_to_json(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Int(i, _) => Value::String(i.to_string()),
        DynSolValue::Uint(u, _) => Value::String(u.to_string()),
        DynSolValue::Address(a) => Value::String(a.to_checksum(None)),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(format!("0x{}", hex::encode(&word[..*size])))
        }
        DynSolValue::Bytes(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(value_to_json).collect())
        }
        other => Value::String(format!("{other:?}")),
    }
}
