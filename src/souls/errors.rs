use thiserror::Error;

/// Errors that can arise while loading or saving the soul ledger.
#[derive(Debug, Error)]
pub enum SoulsError {
    /// Wrapper around IO errors (data directory creation, file writes, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around JSON encoding and decoding errors for the souls document.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted player key that is not a UUID.
    #[error("invalid player id '{0}'")]
    InvalidPlayerId(String),

    /// Internal error (task join errors, unexpected conditions)
    #[error("internal error: {0}")]
    Internal(String),
}
