//! Provider factory: resolves a chain's RPC endpoint and hands out readers.
//!
//! Endpoint resolution and validation are synchronous and fail before any
//! network call. Connectivity is checked by a fire-and-forget probe whose
//! outcome is only logged.

use std::sync::Arc;
use std::time::Duration;

use alloy::network::Ethereum;
use alloy::providers::RootProvider;
use dashmap::DashMap;
use url::Url;

use crate::chain::ChainKey;
use crate::config::{ExplorerConfig, is_placeholder};
use crate::error::ExplorerError;
use crate::reader::ChainReader;

pub const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Streaming schemes are mapped to their request/response counterpart:
/// `wss://` to `https://`, `ws://` to `http://`.
pub fn normalize_rpc_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{rest}")
    } else {
        url.to_string()
    }
}

pub struct ProviderFactory {
    config: Arc<ExplorerConfig>,
    cache: Option<DashMap<ChainKey, ChainReader>>,
}

impl ProviderFactory {
    pub fn new(config: Arc<ExplorerConfig>) -> Self {
        let cache = config.provider_cache.then(DashMap::new);
        Self { config, cache }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Resolve and validate the RPC URL for `chain`.
    pub fn resolve_url(&self, chain: ChainKey) -> Result<Url, ExplorerError> {
        let env = chain.config().rpc_env;
        let raw = self
            .config
            .rpc_url(chain)
            .ok_or_else(|| ExplorerError::MissingConfiguration(env.to_string()))?;
        if is_placeholder(&raw) {
            return Err(ExplorerError::MissingConfiguration(format!(
                "{env} still contains a placeholder value"
            )));
        }
        normalize_rpc_url(&raw)
            .parse()
            .map_err(|e| ExplorerError::MissingConfiguration(format!("{env} is not a valid URL: {e}")))
    }

    /// Reader bound to `chain`'s endpoint. Returns without waiting on the
    /// network; a connectivity probe is spawned alongside.
    pub fn connect(&self, chain: ChainKey) -> Result<ChainReader, ExplorerError> {
        if let Some(cache) = &self.cache
            && let Some(reader) = cache.get(&chain)
        {
            return Ok(reader.clone());
        }

        let url = self.resolve_url(chain)?;
        tracing::debug!(%chain, host = url.host_str().unwrap_or_default(), "creating provider");
        let reader = ChainReader::new(chain, RootProvider::<Ethereum>::new_http(url));

        spawn_probe(reader.clone());

        if let Some(cache) = &self.cache {
            cache.insert(chain, reader.clone());
        }
        Ok(reader)
    }

    /// Drop the cached reader for `chain`, if any.
    pub fn invalidate(&self, chain: ChainKey) {
        if let Some(cache) = &self.cache {
            cache.remove(&chain);
        }
    }

    pub fn clear(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    pub fn cached(&self) -> usize {
        self.cache.as_ref().map_or(0, DashMap::len)
    }
}

fn spawn_probe(reader: ChainReader) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
        tracing::debug!(chain = %reader.chain(), "no runtime, skipping connectivity probe");
        return;
    };

    handle.spawn(async move {
        let chain = reader.chain();
        match tokio::time::timeout(PROBE_TIMEOUT, reader.probe()).await {
            Ok(Ok(report)) => tracing::info!(
                %chain,
                block = report.block_number,
                chain_id = report.chain_id,
                gas_price = report.gas_price,
                "provider connected"
            ),
            Ok(Err(e)) => tracing::warn!(%chain, error = %e, "provider connectivity check failed"),
            Err(_) => tracing::warn!(
                %chain,
                timeout_secs = PROBE_TIMEOUT.as_secs(),
                "provider connectivity check timed out"
            ),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(config: ExplorerConfig) -> ProviderFactory {
        ProviderFactory::new(Arc::new(config))
    }

    #[test]
    fn test_normalize_rpc_url() {
        assert_eq!(
            normalize_rpc_url("wss://arb-sepolia.example/v2/key"),
            "https://arb-sepolia.example/v2/key"
        );
        assert_eq!(normalize_rpc_url("ws://localhost:8546"), "http://localhost:8546");
        assert_eq!(normalize_rpc_url("https://rpc.example"), "https://rpc.example");
    }

    #[test]
    fn test_resolution_order() {
        let config = ExplorerConfig::default()
            .with_endpoint(
                ChainKey::ArbitrumOne,
                Some("wss://ws.example/key"),
                Some("https://http.example/key"),
            )
            .with_endpoint(ChainKey::PolygonPos, None, Some("https://http.example/poly"));
        let factory = factory(config);

        assert_eq!(
            factory.resolve_url(ChainKey::ArbitrumOne).unwrap().as_str(),
            "https://ws.example/key"
        );
        assert_eq!(
            factory.resolve_url(ChainKey::PolygonPos).unwrap().as_str(),
            "https://http.example/poly"
        );
        // Nothing configured: hardcoded fallback
        assert_eq!(
            factory.resolve_url(ChainKey::PolygonAmoy).unwrap().as_str(),
            "https://rpc-amoy.polygon.technology/"
        );
    }

    #[test]
    fn test_placeholder_is_rejected() {
        let config = ExplorerConfig::default().with_endpoint(
            ChainKey::ArbitrumSepolia,
            Some("wss://arb-sepolia.g.alchemy.com/v2/YOUR_API_KEY"),
            None,
        );
        let err = factory(config)
            .connect(ChainKey::ArbitrumSepolia)
            .unwrap_err();
        assert!(matches!(err, ExplorerError::MissingConfiguration(_)));
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let config = ExplorerConfig::default().with_endpoint(
            ChainKey::ArbitrumSepolia,
            None,
            Some("not a url"),
        );
        assert!(matches!(
            factory(config).resolve_url(ChainKey::ArbitrumSepolia),
            Err(ExplorerError::MissingConfiguration(_))
        ));
    }

    #[test]
    fn test_connect_without_runtime() {
        // No tokio runtime: the probe is skipped, the reader still returned
        let reader = factory(ExplorerConfig::default())
            .connect(ChainKey::ArbitrumOne)
            .unwrap();
        assert_eq!(reader.chain(), ChainKey::ArbitrumOne);
    }

    #[test]
    fn test_cache_disabled_by_default() {
        let factory = factory(ExplorerConfig::default());
        factory.connect(ChainKey::ArbitrumOne).unwrap();
        assert_eq!(factory.cached(), 0);
    }

    #[test]
    fn test_cache_invalidation() {
        let config = ExplorerConfig {
            provider_cache: true,
            ..ExplorerConfig::default()
        };
        let factory = factory(config);

        factory.connect(ChainKey::ArbitrumOne).unwrap();
        factory.connect(ChainKey::ArbitrumOne).unwrap();
        factory.connect(ChainKey::PolygonPos).unwrap();
        assert_eq!(factory.cached(), 2);

        factory.invalidate(ChainKey::ArbitrumOne);
        assert_eq!(factory.cached(), 1);

        factory.clear();
        assert_eq!(factory.cached(), 0);
    }
}
