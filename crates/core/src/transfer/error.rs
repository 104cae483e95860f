//! Transfer error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors raised while brokering or proxying a transfer.
#[derive(Debug, Error)]
pub enum TransferError {
    /// A field required by the selected mechanism is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Object absent on download.
    #[error("file not found: {key}")]
    NotFound {
        /// Storage key that was not found.
        key: String,
    },

    /// Proxy request carried no key.
    #[error("Missing key")]
    MissingKey,

    /// Proxy key would resolve outside the binding root.
    #[error("Invalid key")]
    InvalidKey,

    /// Proxy request arrived but no storage binding is configured.
    #[error("storage binding not found")]
    MissingBinding,

    /// Proxy upload carried no payload.
    #[error("No body")]
    MissingBody,

    /// Signing or storage call failed.
    #[error("{0}")]
    Transport(String),
}

impl TransferError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a transport error from any displayable failure.
    #[must_use]
    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<StorageError> for TransferError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { key } => Self::NotFound { key },
            StorageError::Configuration(msg) => Self::Configuration(msg),
            StorageError::Operation(msg) => Self::Transport(msg),
        }
    }
}
