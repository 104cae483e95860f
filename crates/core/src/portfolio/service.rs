//! Portfolio service implementation.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::error::PortfolioError;
use super::types::{
    FileRecord, Folder, NewFileRecord, NewFolder, NewUser, RequestUploadInput, Role, UploadGrant,
    User,
};
use crate::storage::StorageKey;
use crate::transfer::{Disposition, StorageStack, TransferTarget};

/// Repository trait for portfolio persistence.
///
/// This trait is implemented by the db crate to provide actual database operations.
/// List operations return newest first.
pub trait PortfolioRepository: Send + Sync {
    /// Find a user by email.
    fn find_user_by_email(
        &self,
        email: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, PortfolioError>> + Send;

    /// Create a user.
    fn create_user(
        &self,
        input: NewUser,
    ) -> impl std::future::Future<Output = Result<User, PortfolioError>> + Send;

    /// Find a user by ID.
    fn find_user(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<User>, PortfolioError>> + Send;

    /// List all users.
    fn list_users(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<User>, PortfolioError>> + Send;

    /// Create a folder.
    fn create_folder(
        &self,
        input: NewFolder,
    ) -> impl std::future::Future<Output = Result<Folder, PortfolioError>> + Send;

    /// Find a folder by ID.
    fn find_folder(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Folder>, PortfolioError>> + Send;

    /// List folders, optionally only those owned by `user_id`.
    fn list_folders(
        &self,
        user_id: Option<Uuid>,
    ) -> impl std::future::Future<Output = Result<Vec<Folder>, PortfolioError>> + Send;

    /// Create a file record.
    fn create_file(
        &self,
        input: NewFileRecord,
    ) -> impl std::future::Future<Output = Result<FileRecord, PortfolioError>> + Send;

    /// Find a file record by ID.
    fn find_file(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<FileRecord>, PortfolioError>> + Send;

    /// List file records in a folder.
    fn list_files(
        &self,
        folder_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<FileRecord>, PortfolioError>> + Send;

    /// Delete a file record. Returns whether a row was removed.
    fn delete_file(
        &self,
        id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, PortfolioError>> + Send;
}

/// Portfolio service for users, folders and files.
pub struct PortfolioService<R: PortfolioRepository> {
    repo: Arc<R>,
    storage: StorageStack,
}

impl<R: PortfolioRepository> PortfolioService<R> {
    /// Create a new portfolio service.
    #[must_use]
    pub fn new(repo: Arc<R>, storage: StorageStack) -> Self {
        Self { repo, storage }
    }

    /// Register a user, or return the existing one with the same email.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the email is malformed, or the
    /// database operation fails.
    pub async fn register_user(&self, name: &str, email: &str) -> Result<User, PortfolioError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(PortfolioError::validation("name is required"));
        }
        if !email.contains('@') {
            return Err(PortfolioError::validation("a valid email is required"));
        }

        if let Some(existing) = self.repo.find_user_by_email(email).await? {
            return Ok(existing);
        }

        self.repo
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                role: Role::Participant,
            })
            .await
    }

    /// List all users.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_users(&self) -> Result<Vec<User>, PortfolioError> {
        self.repo.list_users().await
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the database operation fails.
    pub async fn get_user(&self, id: Uuid) -> Result<User, PortfolioError> {
        self.repo
            .find_user(id)
            .await?
            .ok_or(PortfolioError::UserNotFound(id))
    }

    /// Create a folder for an existing user.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the user does not exist, or the
    /// database operation fails.
    pub async fn create_folder(
        &self,
        user_id: Uuid,
        cohort_id: Option<Uuid>,
        name: &str,
    ) -> Result<Folder, PortfolioError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PortfolioError::validation("folder name is required"));
        }
        if self.repo.find_user(user_id).await?.is_none() {
            return Err(PortfolioError::UserNotFound(user_id));
        }

        self.repo
            .create_folder(NewFolder {
                user_id,
                cohort_id,
                name: name.to_string(),
            })
            .await
    }

    /// List folders, optionally filtered by owner.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_folders(&self, user_id: Option<Uuid>) -> Result<Vec<Folder>, PortfolioError> {
        self.repo.list_folders(user_id).await
    }

    /// Record a new file and return where the client should upload it.
    ///
    /// The row is inserted before the target is obtained. If the broker
    /// fails, the row is deleted again before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Folder does not exist
    /// - Name is blank
    /// - Size exceeds the configured limit
    /// - The broker cannot produce a target
    /// - Database operation fails
    pub async fn request_upload(
        &self,
        input: RequestUploadInput,
    ) -> Result<UploadGrant, PortfolioError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(PortfolioError::validation("file name is required"));
        }
        if input.mime_type.trim().is_empty() {
            return Err(PortfolioError::validation("file type is required"));
        }
        let max = self.storage.max_file_size;
        if input.size > max {
            return Err(PortfolioError::FileTooLarge {
                size: input.size,
                max,
            });
        }
        if self.repo.find_folder(input.folder_id).await?.is_none() {
            return Err(PortfolioError::FolderNotFound(input.folder_id));
        }

        let key = StorageKey::for_folder(input.folder_id, name);
        let file = self
            .repo
            .create_file(NewFileRecord {
                id: Uuid::new_v4(),
                folder_id: input.folder_id,
                storage_key: key.as_str().to_string(),
                name: name.to_string(),
                size: i64::try_from(input.size).unwrap_or(i64::MAX),
                mime_type: input.mime_type.clone(),
            })
            .await?;

        let target = match self
            .storage
            .broker
            .upload_target(key.as_str(), &input.mime_type)
            .await
        {
            Ok(target) => target,
            Err(e) => {
                if let Err(cleanup) = self.repo.delete_file(file.id).await {
                    warn!(file_id = %file.id, error = %cleanup, "failed to remove file record");
                }
                return Err(e.into());
            }
        };

        info!(
            file_id = %file.id,
            key = %key,
            mechanism = target.mechanism.as_str(),
            "upload requested"
        );
        Ok(UploadGrant { file, target })
    }

    /// List files in a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_files(&self, folder_id: Uuid) -> Result<Vec<FileRecord>, PortfolioError> {
        self.repo.list_files(folder_id).await
    }

    /// Download target for a file, shown inline under its original name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or the broker fails.
    pub async fn download_target(&self, file_id: Uuid) -> Result<TransferTarget, PortfolioError> {
        let file = self
            .repo
            .find_file(file_id)
            .await?
            .ok_or(PortfolioError::FileNotFound(file_id))?;

        Ok(self
            .storage
            .broker
            .download_target(&file.storage_key, Some(&file.name), Disposition::Inline)
            .await?)
    }

    /// Delete a file record, then its object.
    ///
    /// Object removal is best effort: a failure is logged and the call still
    /// succeeds once the row is gone.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or the database operation fails.
    pub async fn delete_file(&self, file_id: Uuid) -> Result<FileRecord, PortfolioError> {
        let file = self
            .repo
            .find_file(file_id)
            .await?
            .ok_or(PortfolioError::FileNotFound(file_id))?;

        if !self.repo.delete_file(file_id).await? {
            return Err(PortfolioError::FileNotFound(file_id));
        }

        if let Some(objects) = &self.storage.objects
            && let Err(e) = objects.delete(&file.storage_key).await
        {
            warn!(file_id = %file_id, key = %file.storage_key, error = %e, "failed to delete object");
        }

        Ok(file)
    }
}
