use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use explorer_runtime::{ChainKey, ExplorerError};

/// A resolver error tagged with the route's stable failure label.
#[derive(Debug)]
pub struct ApiError {
    pub label: &'static str,
    pub source: ExplorerError,
    /// Echoed in 500 bodies by routes that report which chain failed.
    pub chain: Option<ChainKey>,
}

impl ApiError {
    pub fn new(label: &'static str, source: ExplorerError) -> Self {
        Self {
            label,
            source,
            chain: None,
        }
    }

    /// `map_err` adapter: `.map_err(ApiError::labeled("Failed to fetch block"))`.
    pub fn labeled(label: &'static str) -> impl FnOnce(ExplorerError) -> Self {
        move |source| Self::new(label, source)
    }

    pub fn with_chain(mut self, chain: ChainKey) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn status(&self) -> StatusCode {
        match &self.source {
            ExplorerError::InvalidInput(_) | ExplorerError::UnknownChain(_) => StatusCode::BAD_REQUEST,
            ExplorerError::BlockNotFound(_) | ExplorerError::TransactionNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> Value {
        match &self.source {
            ExplorerError::InvalidInput(message) => json!({"error": message}),
            ExplorerError::UnknownChain(_) => json!({
                "error": "Unknown chain",
                "details": self.source.to_string(),
            }),
            ExplorerError::BlockNotFound(_) => json!({"error": "Block not found"}),
            ExplorerError::TransactionNotFound(_) => json!({"error": "Transaction not found"}),
            other => {
                let mut body = json!({
                    "error": self.label,
                    "details": other.to_string(),
                });
                if let Some(chain) = self.chain {
                    body["chain"] = json!(chain);
                }
                body
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(label = self.label, chain = ?self.chain, error = %self.source, "request failed");
        } else {
            tracing::debug!(label = self.label, error = %self.source, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
