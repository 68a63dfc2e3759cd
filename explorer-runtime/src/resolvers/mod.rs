//! Resolvers turn one classified query plus a chain into a JSON-ready value.
//!
//! Each resolver validates its input before touching the network, connects
//! through the [`ProviderFactory`](crate::ProviderFactory), fans out the
//! independent upstream calls and shapes the result.

pub mod address;
pub mod block;
pub mod bridge;
pub mod transaction;

pub use address::{MAX_TRANSFERS, TRANSFER_WINDOW, address_summary};
pub use block::{block, latest_block, parse_block_param};
pub use bridge::{BRIDGE_WINDOW, DEFAULT_LIMIT, MAX_LIMIT, clamp_limit, recent_bridge_events};
pub use transaction::transaction;

use alloy::dyn_abi::DynSolValue;

/// First block of a trailing window ending at `latest`.
pub(crate) fn window_start(latest: u64, window: u64) -> u64 {
    latest.saturating_sub(window)
}

/// Render a decoded address or integer argument as the string the API emits.
pub(crate) fn arg_string(value: &DynSolValue) -> Option<String> {
    match value {
        DynSolValue::Address(a) => Some(a.to_checksum(None)),
        DynSolValue::Uint(u, _) => Some(u.to_string()),
        DynSolValue::Int(i, _) => Some(i.to_string()),
        other => crate::decoder::value_to_json(other)
            .as_str()
            .map(str::to_string),
    }
}
