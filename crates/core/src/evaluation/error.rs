//! Evaluation error types.

use thiserror::Error;
use uuid::Uuid;

use crate::transfer::TransferError;

/// Evaluation operation errors.
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// Folder not found.
    #[error("folder not found: {0}")]
    FolderNotFound(Uuid),

    /// Invalid input.
    #[error("{0}")]
    Validation(String),

    /// Score outside 0..=100.
    #[error("score must be between 0 and 100, got {0}")]
    ScoreOutOfRange(i32),

    /// Obtaining a transfer target failed.
    #[error(transparent)]
    Transfer(#[from] TransferError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl EvaluationError {
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
