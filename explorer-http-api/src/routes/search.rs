use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use explorer_runtime::query;

use crate::{ApiError, ExplorerApiState};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub chain: Option<String>,
}

pub fn router() -> Router<Arc<ExplorerApiState>> {
    Router::new().route("/api/search", get(search))
}

/// Classify `q` and redirect (307) to the matching resolver.
async fn search(
    State(state): State<Arc<ExplorerApiState>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let chain = match state.chain(params.chain.as_deref()) {
        Ok(chain) => chain,
        Err(e) => return ApiError::new("Invalid chain", e).into_response(),
    };

    if !state.config.has_configured_endpoint(chain) {
        let env = chain.config().rpc_env;
        tracing::error!(%chain, env, "RPC endpoint not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "error": "RPC endpoint not configured",
                "details": format!("Missing environment variable: {env}"),
                "solution": "Set the chain's RPC endpoint in .env"
            })),
        )
            .into_response();
    }

    let q = params.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "Missing q"}))).into_response();
    }

    let classified = query::classify(q);
    match classified.resolver_path() {
        Some(path) => {
            let location = format!("{path}?chain={chain}");
            tracing::info!(%chain, kind = ?classified.kind, %location, "search redirect");
            Redirect::temporary(&location).into_response()
        }
        None => {
            tracing::debug!(%chain, query = q, "unrecognized search query");
            (StatusCode::BAD_REQUEST, Json(json!({"error": "Unrecognized query"}))).into_response()
        }
    }
}
