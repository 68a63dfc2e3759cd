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

const LABEL: &str = "Failed to fetch transaction";

pub fn router() -> Router<Arc<ExplorerApiState>> {
    Router::new().route("/api/tx/{hash}", get(get_transaction))
}

async fn get_transaction(
    State(state): State<Arc<ExplorerApiState>>,
    Path(hash): Path<String>,
    Query(query): Query<ChainQuery>,
) -> Result<Json<Value>, ApiError> {
    let chain = state
        .chain(query.chain.as_deref())
        .map_err(ApiError::labeled(LABEL))?;

    let summary = resolvers::transaction(&state.providers, chain, &hash)
        .await
        .map_err(ApiError::labeled(LABEL))?;

    Ok(Json(json::to_json(&summary).map_err(ApiError::labeled(LABEL))?))
}
