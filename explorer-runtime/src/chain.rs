//! Registry of the chains the explorer can query.
//!
//! The set is closed: every chain is known at compile time together with its
//! numeric id, RPC environment variable and the two contract deployments
//! (ZYL token and bridge) the resolvers read from.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{Address, address};
use serde::{Deserialize, Serialize};

use crate::error::ExplorerError;

/// ZYL token deployment. Same address on every supported chain.
pub const ZYL_TOKEN: Address = address!("d873a2649c7e1e020c2249a4aaaa248ec02d837b");

/// Zelion bridge deployment. Same address on every supported chain.
pub const ZELION_BRIDGE: Address = address!("20471cf7a5c04f0640d90584c0d42f01f74ec1b0");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainKey {
    #[serde(rename = "arbitrumSepolia")]
    ArbitrumSepolia,
    #[serde(rename = "polygonAmoy")]
    PolygonAmoy,
    #[serde(rename = "arbitrumOne")]
    ArbitrumOne,
    #[serde(rename = "polygonPOS")]
    PolygonPos,
}

/// Static description of one supported chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub key: ChainKey,
    pub id: u64,
    pub name: &'static str,
    /// Name of the WebSocket-style env var holding the RPC URL.
    pub rpc_env: &'static str,
    pub token: Address,
    pub bridge: Address,
    /// Used when neither RPC env var is set.
    pub fallback_rpc: &'static str,
}

static CHAINS: [ChainConfig; 4] = [
    ChainConfig {
        key: ChainKey::ArbitrumSepolia,
        id: 421614,
        name: "Arbitrum Sepolia",
        rpc_env: "ALCHEMY_ARBITRUM_SEPOLIA_WS",
        token: ZYL_TOKEN,
        bridge: ZELION_BRIDGE,
        fallback_rpc: "https://sepolia-rollup.arbitrum.io/rpc",
    },
    ChainConfig {
        key: ChainKey::PolygonAmoy,
        id: 80002,
        name: "Polygon Amoy",
        rpc_env: "ALCHEMY_POLYGON_AMOY_WS",
        token: ZYL_TOKEN,
        bridge: ZELION_BRIDGE,
        fallback_rpc: "https://rpc-amoy.polygon.technology",
    },
    ChainConfig {
        key: ChainKey::ArbitrumOne,
        id: 42161,
        name: "Arbitrum One",
        rpc_env: "ALCHEMY_ARBITRUM_ONE_WS",
        token: ZYL_TOKEN,
        bridge: ZELION_BRIDGE,
        fallback_rpc: "https://arb1.arbitrum.io/rpc",
    },
    ChainConfig {
        key: ChainKey::PolygonPos,
        id: 137,
        name: "Polygon PoS",
        rpc_env: "ALCHEMY_POLYGON_POS_WS",
        token: ZYL_TOKEN,
        bridge: ZELION_BRIDGE,
        fallback_rpc: "https://polygon-rpc.com",
    },
];

impl ChainKey {
    pub const ALL: [ChainKey; 4] = [
        ChainKey::ArbitrumSepolia,
        ChainKey::PolygonAmoy,
        ChainKey::ArbitrumOne,
        ChainKey::PolygonPos,
    ];

    /// Wire name, as accepted in the `chain` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKey::ArbitrumSepolia => "arbitrumSepolia",
            ChainKey::PolygonAmoy => "polygonAmoy",
            ChainKey::ArbitrumOne => "arbitrumOne",
            ChainKey::PolygonPos => "polygonPOS",
        }
    }

    pub fn config(self) -> &'static ChainConfig {
        match self {
            ChainKey::ArbitrumSepolia => &CHAINS[0],
            ChainKey::PolygonAmoy => &CHAINS[1],
            ChainKey::ArbitrumOne => &CHAINS[2],
            ChainKey::PolygonPos => &CHAINS[3],
        }
    }
}

impl fmt::Display for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChainKey {
    type Err = ExplorerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ChainKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ExplorerError::UnknownChain(s.to_string()))
    }
}

impl ChainConfig {
    /// HTTP-style counterpart of `rpc_env` (`_WS` suffix swapped for `_HTTP`).
    pub fn http_env(&self) -> String {
        match self.rpc_env.strip_suffix("_WS") {
            Some(stem) => format!("{stem}_HTTP"),
            None => format!("{}_HTTP", self.rpc_env),
        }
    }
}

/// Look up a chain by its wire name.
pub fn resolve(chain_key: &str) -> Result<&'static ChainConfig, ExplorerError> {
    chain_key.parse::<ChainKey>().map(ChainKey::config)
}

/// Map a numeric chain id back to the supported chain, if any.
pub fn detect_network(chain_id: u64) -> Option<ChainKey> {
    CHAINS.iter().find(|c| c.id == chain_id).map(|c| c.key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_chains() {
        let cfg = resolve("arbitrumSepolia").unwrap();
        assert_eq!(cfg.id, 421614);
        assert_eq!(cfg.name, "Arbitrum Sepolia");
        assert_eq!(resolve("polygonPOS").unwrap().id, 137);
        assert_eq!(resolve("arbitrumOne").unwrap().id, 42161);
        assert_eq!(resolve("polygonAmoy").unwrap().id, 80002);
    }

    #[test]
    fn test_resolve_unknown_chain() {
        let err = resolve("ethereum").unwrap_err();
        assert!(matches!(err, ExplorerError::UnknownChain(ref c) if c == "ethereum"));
        // Wire names are case-sensitive
        assert!(resolve("polygonpos").is_err());
    }

    #[test]
    fn test_config_matches_key() {
        for key in ChainKey::ALL {
            assert_eq!(key.config().key, key);
            assert_eq!(key.as_str().parse::<ChainKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_http_env_derivation() {
        assert_eq!(
            ChainKey::PolygonAmoy.config().http_env(),
            "ALCHEMY_POLYGON_AMOY_HTTP"
        );
    }

    #[test]
    fn test_detect_network() {
        assert_eq!(detect_network(42161), Some(ChainKey::ArbitrumOne));
        assert_eq!(detect_network(1), None);
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&ChainKey::PolygonPos).unwrap();
        assert_eq!(json, "\"polygonPOS\"");
    }
}
