//! Contract interfaces the explorer reads from.
//!
//! `IZylToken` is a compile-time binding for the view calls made by the
//! address resolver. Event decoding goes through the versioned JSON fixtures
//! instead, parsed at runtime by [`crate::abi`], so new fixtures can be
//! dropped in without touching the bindings.

use alloy::json_abi::JsonAbi;
use alloy::sol;

use crate::abi;
use crate::error::ExplorerError;

sol! {
    #[sol(rpc)]
    interface IZylToken {
        event Transfer(address indexed from, address indexed to, uint256 value);

        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
    }
}

pub const ZELION_BRIDGE_V3_ABI: &str = include_str!("../abis/ZelionBridgeV3.json");
pub const ZYL_TOKEN_ABI: &str = include_str!("../abis/ZYLToken.json");
pub const ROUTER_ABI: &str = include_str!("../abis/Router.json");

/// Contracts with a bundled ABI fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownContract {
    Bridge,
    Token,
    Router,
}

impl KnownContract {
    /// Order in which receipts are decoded: first match wins.
    pub const DECODE_ORDER: [KnownContract; 3] =
        [KnownContract::Bridge, KnownContract::Token, KnownContract::Router];

    pub fn name(&self) -> &'static str {
        match self {
            KnownContract::Bridge => "bridge",
            KnownContract::Token => "token",
            KnownContract::Router => "router",
        }
    }

    pub fn fixture(&self) -> &'static str {
        match self {
            KnownContract::Bridge => ZELION_BRIDGE_V3_ABI,
            KnownContract::Token => ZYL_TOKEN_ABI,
            KnownContract::Router => ROUTER_ABI,
        }
    }

    pub fn abi(&self) -> Result<JsonAbi, ExplorerError> {
        abi::parse_fixture(self.fixture())
    }
}
