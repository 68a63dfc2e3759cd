pub mod error;
pub mod chain;
pub mod config;
pub mod contracts;
pub mod abi;
pub mod decoder;
pub mod json;
pub mod query;
pub mod provider;
pub mod reader;
pub mod types;
pub mod resolvers;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use chain::{ChainConfig, ChainKey};
pub use config::ExplorerConfig;
pub use error::ExplorerError;
pub use provider::ProviderFactory;
pub use types::*;
