use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use explorer_runtime::{json, resolvers};

use crate::{ApiError, ExplorerApiState};

const LABEL: &str = "Failed to fetch bridge events";

#[derive(Debug, Deserialize)]
pub struct BridgeQuery {
    pub chain: Option<String>,
    /// Kept as text so a non-numeric value falls back to the default.
    pub limit: Option<String>,
}

pub fn router() -> Router<Arc<ExplorerApiState>> {
    Router::new().route("/api/bridge/recent", get(recent))
}

async fn recent(
    State(state): State<Arc<ExplorerApiState>>,
    Query(query): Query<BridgeQuery>,
) -> Result<Json<Value>, ApiError> {
    let chain = state
        .chain(query.chain.as_deref())
        .map_err(ApiError::labeled(LABEL))?;
    let limit = resolvers::clamp_limit(query.limit.as_deref());

    let events = resolvers::recent_bridge_events(&state.providers, chain, limit)
        .await
        .map_err(ApiError::labeled(LABEL))?;
    tracing::info!(%chain, limit, events = events.len(), "bridge events resolved");

    Ok(Json(json::to_json(&events).map_err(ApiError::labeled(LABEL))?))
}
