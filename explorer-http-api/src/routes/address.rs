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

const LABEL: &str = "Failed to fetch address data";

pub fn router() -> Router<Arc<ExplorerApiState>> {
    Router::new().route("/api/address/{address}", get(get_address))
}

async fn get_address(
    State(state): State<Arc<ExplorerApiState>>,
    Path(address): Path<String>,
    Query(query): Query<ChainQuery>,
) -> Result<Json<Value>, ApiError> {
    let chain = state
        .chain(query.chain.as_deref())
        .map_err(ApiError::labeled(LABEL))?;

    let summary = resolvers::address_summary(&state.providers, chain, &address)
        .await
        .map_err(ApiError::labeled(LABEL))?;
    tracing::info!(
        %chain,
        address = %summary.address,
        transfers = summary.transfers.len(),
        "address resolved"
    );

    Ok(Json(json::to_json(&summary).map_err(ApiError::labeled(LABEL))?))
}
