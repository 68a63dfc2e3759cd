use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Unknown chain: {0}")]
    UnknownChain(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Block not found: {0}")]
    BlockNotFound(u64),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Missing RPC env var: {0}")]
    MissingConfiguration(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Malformed ABI: {0}")]
    MalformedAbi(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

impl ExplorerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ExplorerError::InvalidInput(message.into())
    }

    /// Whether the error describes an absent block or transaction.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ExplorerError::BlockNotFound(_) | ExplorerError::TransactionNotFound(_)
        )
    }
}

impl From<alloy::transports::TransportError> for ExplorerError {
    fn from(e: alloy::transports::TransportError) -> Self {
        ExplorerError::Upstream(e.to_string())
    }
}

impl From<alloy::contract::Error> for ExplorerError {
    fn from(e: alloy::contract::Error) -> Self {
        ExplorerError::Upstream(e.to_string())
    }
}

impl From<serde_json::Error> for ExplorerError {
    fn from(e: serde_json::Error) -> Self {
        ExplorerError::Decode(e.to_string())
    }
}

impl From<alloy::dyn_abi::Error> for ExplorerError {
    fn from(e: alloy::dyn_abi::Error) -> Self {
        ExplorerError::Decode(e.to_string())
    }
}
