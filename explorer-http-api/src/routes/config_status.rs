use axum::{Router, routing::get, extract::State, Json};
use explorer_runtime::config::ConfigStatus;
use std::sync::Arc;
use crate::ExplorerApiState;

pub fn router() -> Router<Arc<ExplorerApiState>> {
    Router::new().route("/api/config/status", get(config_status))
}

async fn config_status(State(state): State<Arc<ExplorerApiState>>) -> Json<ConfigStatus> {
    let status = state.config.status();
    if status.valid {
        tracing::debug!(networks = ?status.networks, "all RPC endpoints configured");
    } else {
        tracing::warn!(missing = ?status.missing, "RPC endpoints missing");
    }
    Json(status)
}
