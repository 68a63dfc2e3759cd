use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use serde_json::Value;
use std::sync::Arc;

use explorer_runtime::{json, resolvers};

use super::ChainQuery;
use crate::{ApiError, ExplorerApiState};

pub fn router() -> Router<Arc<ExplorerApiState>> {
    Router::new()
        .route("/api/block/latest", get(latest_block))
        .route("/api/block/{num}", get(get_block))
}

async fn get_block(
    State(state): State<Arc<ExplorerApiState>>,
    Path(num): Path<String>,
    Query(query): Query<ChainQuery>,
) -> Result<Json<Value>, ApiError> {
    const LABEL: &str = "Failed to fetch block";

    let chain = state
        .chain(query.chain.as_deref())
        .map_err(ApiError::labeled(LABEL))?;
    let number = resolvers::parse_block_param(&num).map_err(ApiError::labeled(LABEL))?;

    let response = resolvers::block(&state.providers, chain, number)
        .await
        .map_err(ApiError::labeled(LABEL))?;

    Ok(Json(json::to_json(&response).map_err(ApiError::labeled(LABEL))?))
}

async fn latest_block(
    State(state): State<Arc<ExplorerApiState>>,
    Query(query): Query<ChainQuery>,
) -> Result<Json<Value>, ApiError> {
    const LABEL: &str = "Failed to get latest block";

    let chain = state
        .chain(query.chain.as_deref())
        .map_err(ApiError::labeled(LABEL))?;

    let latest = resolvers::latest_block(&state.providers, chain)
        .await
        .map_err(|e| ApiError::new(LABEL, e).with_chain(chain))?;

    Ok(Json(json::to_json(&latest).map_err(ApiError::labeled(LABEL))?))
}
