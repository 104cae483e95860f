//! Portfolio error types.

use thiserror::Error;
use uuid::Uuid;

use crate::storage::StorageError;
use crate::transfer::TransferError;

/// Portfolio operation errors.
#[derive(Debug, Error)]
pub enum PortfolioError {
    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    /// Folder not found.
    #[error("folder not found: {0}")]
    FolderNotFound(Uuid),

    /// File not found.
    #[error("file not found: {0}")]
    FileNotFound(Uuid),

    /// Invalid input.
    #[error("{0}")]
    Validation(String),

    /// File too large.
    #[error("file too large: {size} bytes exceeds maximum {max} bytes")]
    FileTooLarge {
        /// Declared file size.
        size: u64,
        /// Maximum allowed size.
        max: u64,
    },

    /// Obtaining a transfer target failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl PortfolioError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
