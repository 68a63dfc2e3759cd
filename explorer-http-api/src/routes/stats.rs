use axum::{Router, routing::get, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use crate::ExplorerApiState;

pub fn router() -> Router<Arc<ExplorerApiState>> {
    Router::new().route("/api/stats", get(stats))
}

/// Placeholder statistics. No aggregation is performed; every figure is zero.
async fn stats() -> Json<Value> {
    Json(json!({
        "zylPrice": {
            "usd": 0,
            "change24h": 0,
            "marketCap": 0
        },
        "supply": {
            "total": "0",
            "circulating": "0",
            "burned": "0"
        },
        "network": {
            "transfersToday": 0,
            "totalBridged": "0",
            "bridgeVolumeUsd": 0,
            "activeValidators": 0,
            "totalValidators": 0,
            "networkHashrate": "0 TH/s"
        },
        "bridge": {
            "totalTransfers": 0,
            "successRate": 0,
            "averageTime": "0 minutes",
            "totalVolume": "0",
            "chains": []
        },
        "topAddresses": [],
        "recentActivity": {
            "blocks": 0,
            "transactions": 0,
            "avgBlockTime": 0,
            "avgGasPrice": 0
        }
    }))
}
