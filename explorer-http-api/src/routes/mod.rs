pub mod address;
pub mod block;
pub mod bridge;
pub mod config_status;
pub mod health;
pub mod search;
pub mod stats;
pub mod tx;

use serde::Deserialize;

/// `?chain=` selector shared by the resolver routes.
#[derive(Debug, Default, Deserialize)]
pub struct ChainQuery {
    pub chain: Option<String>,
}
