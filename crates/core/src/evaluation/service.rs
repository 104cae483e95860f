//! Evaluation service implementation.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use super::error::EvaluationError;
use super::types::{AttachmentGrant, Evaluation, MAX_SCORE, NewEvaluation};
use crate::storage::StorageKey;
use crate::transfer::{Disposition, TransferBroker, TransferTarget};

/// Name used for by-key downloads that do not supply one.
pub const DEFAULT_DOWNLOAD_NAME: &str = "download";

/// Repository trait for evaluation persistence.
pub trait EvaluationRepository: Send + Sync {
    /// Check if a folder exists.
    fn folder_exists(
        &self,
        folder_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, EvaluationError>> + Send;

    /// Create an evaluation.
    fn create(
        &self,
        input: NewEvaluation,
    ) -> impl std::future::Future<Output = Result<Evaluation, EvaluationError>> + Send;

    /// List evaluations for a folder, newest first.
    fn list_for_folder(
        &self,
        folder_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Evaluation>, EvaluationError>> + Send;
}

/// Evaluation service.
pub struct EvaluationService<R: EvaluationRepository> {
    repo: Arc<R>,
    broker: TransferBroker,
}

impl<R: EvaluationRepository> EvaluationService<R> {
    /// Create a new evaluation service.
    #[must_use]
    pub fn new(repo: Arc<R>, broker: TransferBroker) -> Self {
        Self { repo, broker }
    }

    /// Create an evaluation for an existing folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the folder does not exist, the score is out of
    /// range, or the database operation fails.
    pub async fn create(&self, input: NewEvaluation) -> Result<Evaluation, EvaluationError> {
        if let Some(score) = input.score
            && !(0..=MAX_SCORE).contains(&score)
        {
            return Err(EvaluationError::ScoreOutOfRange(score));
        }
        if !self.repo.folder_exists(input.folder_id).await? {
            return Err(EvaluationError::FolderNotFound(input.folder_id));
        }

        let evaluation = self.repo.create(input).await?;
        info!(
            evaluation_id = %evaluation.id,
            folder_id = %evaluation.folder_id,
            "evaluation created"
        );
        Ok(evaluation)
    }

    /// List evaluations for a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_for_folder(&self, folder_id: Uuid) -> Result<Vec<Evaluation>, EvaluationError> {
        self.repo.list_for_folder(folder_id).await
    }

    /// Upload target for a feedback attachment under `feedback/{uuid}/{name}`.
    ///
    /// No row is written; the caller stores the key on the evaluation.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or type is blank or the broker fails.
    pub async fn request_attachment_upload(
        &self,
        name: &str,
        mime_type: &str,
    ) -> Result<AttachmentGrant, EvaluationError> {
        let name = name.trim();
        if name.is_empty() || mime_type.trim().is_empty() {
            return Err(EvaluationError::validation("name and type are required"));
        }

        let key = StorageKey::for_feedback(name);
        let target = self.broker.upload_target(key.as_str(), mime_type).await?;
        Ok(AttachmentGrant {
            key: key.into_inner(),
            target,
        })
    }

    /// Download target for an arbitrary key, forced as an attachment.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is blank or the broker fails.
    pub async fn download_by_key(
        &self,
        key: &str,
        name: Option<&str>,
    ) -> Result<TransferTarget, EvaluationError> {
        if key.is_empty() {
            return Err(EvaluationError::validation("Missing key"));
        }
        if !StorageKey::is_safe(key) {
            return Err(EvaluationError::validation("Invalid key"));
        }
        let name = name
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_DOWNLOAD_NAME);

        Ok(self
            .broker
            .download_target(key, Some(name), Disposition::Attachment)
            .await?)
    }
}
