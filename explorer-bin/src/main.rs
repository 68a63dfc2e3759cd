use std::sync::Arc;

use explorer_http_api::{ExplorerApiState, build_router};
use explorer_runtime::ExplorerConfig;

fn setup_log() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .try_init()
        .is_err()
    {}
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Explorer shutting down...");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    setup_log();

    // ── 1. Configuration ─────────────────────────────────────────────────────
    let config = ExplorerConfig::from_env()?;
    let status = config.status();
    if status.valid {
        tracing::info!(
            networks = ?status.networks,
            default_chain = %config.default_chain,
            "All RPC endpoints configured"
        );
    } else {
        tracing::warn!(
            missing = ?status.missing,
            configured = status.configured_count,
            total = status.total_required,
            "RPC configuration incomplete, public fallbacks will be used"
        );
    }

    // ── 2. HTTP server ───────────────────────────────────────────────────────
    let port = config.http_port;
    let state = Arc::new(ExplorerApiState::new(config));
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| format!("Explorer API bind failed: {e}"))?;
    tracing::info!("Explorer API listening on 0.0.0.0:{port}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
