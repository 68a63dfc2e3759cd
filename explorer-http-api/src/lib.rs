pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use explorer_runtime::{ChainKey, ExplorerConfig, ExplorerError, ProviderFactory};

pub use error::ApiError;

pub struct ExplorerApiState {
    pub config: Arc<ExplorerConfig>,
    pub providers: ProviderFactory,
}

impl ExplorerApiState {
    pub fn new(config: ExplorerConfig) -> Self {
        let config = Arc::new(config);
        Self {
            providers: ProviderFactory::new(config.clone()),
            config,
        }
    }

    /// Validate the `chain` query value, defaulting when absent.
    pub fn chain(&self, requested: Option<&str>) -> Result<ChainKey, ExplorerError> {
        self.config.chain_or_default(requested)
    }
}

pub fn build_router(state: Arc<ExplorerApiState>) -> Router {
    let cors = cors_layer(&state.config.cors_allowed_origins);
    Router::new()
        .merge(routes::health::router())
        .merge(routes::stats::router())
        .merge(routes::config_status::router())
        .merge(routes::search::router())
        .merge(routes::address::router())
        .merge(routes::block::router())
        .merge(routes::tx::router())
        .merge(routes::bridge::router())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
