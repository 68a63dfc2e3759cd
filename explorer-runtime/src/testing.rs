//! JSON-RPC mock node for resolver and route tests.
//!
//! [`RpcMock`] is a `wiremock` responder that answers by `method`, by 4-byte
//! selector for `eth_call`, and by topic for `eth_getLogs`. Anything not
//! configured answers with a JSON-RPC "method not found" error.

use std::collections::HashMap;

use alloy::primitives::{Address, B256, U256};
use serde_json::{Value, json};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

type Outcome = Result<Value, (i64, String)>;

struct LogRule {
    position: usize,
    topic: B256,
    outcome: Outcome,
}

#[derive(Default)]
pub struct RpcMock {
    methods: HashMap<String, Outcome>,
    calls: HashMap<[u8; 4], Outcome>,
    log_rules: Vec<LogRule>,
}

impl RpcMock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn result(mut self, rpc_method: &str, result: Value) -> Self {
        self.methods.insert(rpc_method.to_string(), Ok(result));
        self
    }

    pub fn error(mut self, rpc_method: &str, message: &str) -> Self {
        self.methods
            .insert(rpc_method.to_string(), Err((-32000, message.to_string())));
        self
    }

    pub fn block_number(self, number: u64) -> Self {
        self.result("eth_blockNumber", json!(quantity(number)))
    }

    /// `eth_call` returning `data` for calls whose input starts with `selector`.
    pub fn call_result(mut self, selector: [u8; 4], data: impl Into<String>) -> Self {
        self.calls.insert(selector, Ok(Value::String(data.into())));
        self
    }

    /// `eth_call` reverting for calls whose input starts with `selector`.
    pub fn call_revert(mut self, selector: [u8; 4]) -> Self {
        self.calls
            .insert(selector, Err((3, "execution reverted".to_string())));
        self
    }

    /// `eth_getLogs` answer for filters whose topic at `position` is `topic`.
    /// Rules are checked in insertion order; `eth_getLogs` falls back to the
    /// plain method result, then to an empty list.
    pub fn logs_for_topic(mut self, position: usize, topic: B256, logs: Vec<Value>) -> Self {
        self.log_rules.push(LogRule {
            position,
            topic,
            outcome: Ok(Value::Array(logs)),
        });
        self
    }

    pub fn logs_error_for_topic(mut self, position: usize, topic: B256, message: &str) -> Self {
        self.log_rules.push(LogRule {
            position,
            topic,
            outcome: Err((-32005, message.to_string())),
        });
        self
    }

    /// Start a mock server answering every POST with this responder.
    pub async fn start(self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(self)
            .mount(&server)
            .await;
        server
    }

    fn dispatch(&self, rpc_method: &str, params: &Value) -> Outcome {
        match rpc_method {
            "eth_call" => self.dispatch_call(params),
            "eth_getLogs" => self.dispatch_logs(params),
            _ => self
                .methods
                .get(rpc_method)
                .cloned()
                .unwrap_or_else(|| Err((-32601, format!("method {rpc_method} not found")))),
        }
    }

    fn dispatch_call(&self, params: &Value) -> Outcome {
        let input = params[0]
            .get("input")
            .or_else(|| params[0].get("data"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        let selector = input
            .strip_prefix("0x")
            .and_then(|digits| digits.get(..8))
            .and_then(|digits| hex::decode(digits).ok())
            .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok());

        match selector.and_then(|s| self.calls.get(&s)) {
            Some(outcome) => outcome.clone(),
            None => Err((3, "execution reverted".to_string())),
        }
    }

    fn dispatch_logs(&self, params: &Value) -> Outcome {
        let topics = &params[0]["topics"];
        for rule in &self.log_rules {
            if topic_matches(&topics[rule.position], rule.topic) {
                return rule.outcome.clone();
            }
        }
        self.methods
            .get("eth_getLogs")
            .cloned()
            .unwrap_or_else(|| Ok(json!([])))
    }
}

fn topic_matches(filter: &Value, topic: B256) -> bool {
    let wanted = topic.to_string();
    match filter {
        Value::String(s) => s.eq_ignore_ascii_case(&wanted),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| s.eq_ignore_ascii_case(&wanted)),
        _ => false,
    }
}

impl Respond for RpcMock {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = serde_json::from_slice::<Value>(&request.body) else {
            return ResponseTemplate::new(400);
        };

        let id = body.get("id").cloned().unwrap_or(Value::Null);
        let rpc_method = body["method"].as_str().unwrap_or_default();

        let payload = match self.dispatch(rpc_method, &body["params"]) {
            Ok(result) => json!({"jsonrpc": "2.0", "id": id, "result": result}),
            Err((code, message)) => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": {"code": code, "message": message}
            }),
        };
        ResponseTemplate::new(200).set_body_json(payload)
    }
}

/// `0x`-prefixed hex quantity.
pub fn quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// ABI-encoded 32-byte word holding `value`.
pub fn encode_uint(value: U256) -> String {
    format!("0x{}", hex::encode(value.to_be_bytes::<32>()))
}

/// A log object as returned by `eth_getLogs` or inside a receipt.
pub fn rpc_log(
    address: Address,
    topics: &[B256],
    data: &[u8],
    block_number: u64,
    tx_hash: B256,
    log_index: u64,
) -> Value {
    json!({
        "address": address,
        "topics": topics,
        "data": format!("0x{}", hex::encode(data)),
        "blockNumber": quantity(block_number),
        "blockHash": B256::with_last_byte(0xbb),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "logIndex": quantity(log_index),
        "removed": false
    })
}
