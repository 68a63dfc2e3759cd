//! Process configuration, built once at startup and shared with every resolver.
//!
//! Env vars:
//! - `ALCHEMY_<CHAIN>_WS` / `ALCHEMY_<CHAIN>_HTTP`: RPC endpoint per chain
//! - `EXPLORER_DEFAULT_CHAIN`: chain used when a request names none (default: `arbitrumSepolia`)
//! - `EXPLORER_HTTP_PORT`: listen port (default: `3000`)
//! - `EXPLORER_PROVIDER_CACHE`: `"true"` reuses one provider per chain
//! - `CORS_ALLOWED_ORIGINS`: comma-separated origins, empty or `*` for permissive

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::chain::ChainKey;
use crate::error::ExplorerError;

/// Substrings marking an env value copied from a template and never filled in.
pub const PLACEHOLDER_MARKERS: [&str; 2] = ["YOUR_API_KEY", "YOUR_ACTUAL_API_KEY_HERE"];

pub const DEFAULT_HTTP_PORT: u16 = 3000;

pub fn is_placeholder(url: &str) -> bool {
    PLACEHOLDER_MARKERS.iter().any(|marker| url.contains(marker))
}

/// RPC endpoints configured for one chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainEndpoints {
    pub ws: Option<String>,
    pub http: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub default_chain: ChainKey,
    pub endpoints: HashMap<ChainKey, ChainEndpoints>,
    pub http_port: u16,
    pub provider_cache: bool,
    pub cors_allowed_origins: Vec<String>,
}

/// Snapshot returned by `/api/config/status`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatus {
    pub valid: bool,
    pub missing: Vec<String>,
    pub networks: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub total_required: usize,
    pub configured_count: usize,
    pub missing_count: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            default_chain: ChainKey::ArbitrumSepolia,
            endpoints: HashMap::new(),
            http_port: DEFAULT_HTTP_PORT,
            provider_cache: false,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ExplorerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ExplorerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary name -> value lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ExplorerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let default_chain = match read("EXPLORER_DEFAULT_CHAIN") {
            Some(name) => name.parse::<ChainKey>()?,
            None => ChainKey::ArbitrumSepolia,
        };

        let endpoints = ChainKey::ALL
            .into_iter()
            .map(|key| {
                let cfg = key.config();
                let endpoints = ChainEndpoints {
                    ws: read(cfg.rpc_env),
                    http: read(&cfg.http_env()),
                };
                (key, endpoints)
            })
            .collect();

        let http_port = read("EXPLORER_HTTP_PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_HTTP_PORT);

        let provider_cache = read("EXPLORER_PROVIDER_CACHE")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let cors_allowed_origins = read("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            default_chain,
            endpoints,
            http_port,
            provider_cache,
            cors_allowed_origins,
        })
    }

    /// Set the endpoints for one chain, replacing whatever was configured.
    pub fn with_endpoint(
        mut self,
        chain: ChainKey,
        ws: Option<&str>,
        http: Option<&str>,
    ) -> Self {
        self.endpoints.insert(
            chain,
            ChainEndpoints {
                ws: ws.map(str::to_string),
                http: http.map(str::to_string),
            },
        );
        self
    }

    /// Resolve a user-supplied chain name, falling back to the default chain
    /// when none was given.
    pub fn chain_or_default(&self, requested: Option<&str>) -> Result<ChainKey, ExplorerError> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.parse(),
            None => Ok(self.default_chain),
        }
    }

    pub fn endpoints(&self, chain: ChainKey) -> ChainEndpoints {
        self.endpoints.get(&chain).cloned().unwrap_or_default()
    }

    /// Candidate RPC URL: WebSocket-style var, then HTTP-style var, then the
    /// chain's hardcoded fallback.
    pub fn rpc_url(&self, chain: ChainKey) -> Option<String> {
        let endpoints = self.endpoints(chain);
        endpoints
            .ws
            .or(endpoints.http)
            .or_else(|| Some(chain.config().fallback_rpc.to_string()))
            .filter(|url| !url.is_empty())
    }

    /// True when an operator supplied a non-placeholder endpoint for the chain.
    pub fn has_configured_endpoint(&self, chain: ChainKey) -> bool {
        let endpoints = self.endpoints(chain);
        [endpoints.ws, endpoints.http]
            .into_iter()
            .flatten()
            .any(|url| !is_placeholder(&url))
    }

    /// Report which chains have a real (non-fallback) WebSocket endpoint.
    pub fn status(&self) -> ConfigStatus {
        let mut missing = Vec::new();
        let mut networks = Vec::new();

        for key in ChainKey::ALL {
            let cfg = key.config();
            let configured = self
                .endpoints(key)
                .ws
                .filter(|url| !is_placeholder(url) && !is_fallback_url(key, url));

            match configured {
                Some(_) => {
                    let network = cfg
                        .rpc_env
                        .to_lowercase()
                        .replace("alchemy_", "")
                        .replace("_ws", "");
                    if !networks.contains(&network) {
                        networks.push(network);
                    }
                }
                None => missing.push(cfg.rpc_env.to_string()),
            }
        }

        if !missing.is_empty() {
            networks.clear();
        }

        ConfigStatus {
            valid: missing.is_empty(),
            missing_count: missing.len(),
            configured_count: networks.len(),
            missing,
            networks,
            timestamp: Utc::now(),
            total_required: ChainKey::ALL.len(),
        }
    }
}

fn is_fallback_url(chain: ChainKey, url: &str) -> bool {
    let fallback = chain.config().fallback_rpc;
    let ws_form = fallback.replacen("https://", "wss://", 1);
    url == fallback || url == ws_form
}
