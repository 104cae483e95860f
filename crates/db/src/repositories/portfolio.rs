//! Portfolio repository for database operations.
//!
//! Implements user, folder and file record persistence using SeaORM.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{files, folders, users};
use folio_core::portfolio::{
    FileRecord, Folder, NewFileRecord, NewFolder, NewUser, PortfolioError,
    PortfolioRepository as PortfolioRepoTrait, Role, User,
};

/// Portfolio repository implementation.
#[derive(Debug, Clone)]
pub struct PortfolioRepository {
    db: DatabaseConnection,
}

impl PortfolioRepository {
    /// Create a new portfolio repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl PortfolioRepoTrait for PortfolioRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, PortfolioError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        model.map(user_to_domain).transpose()
    }

    async fn create_user(&self, input: NewUser) -> Result<User, PortfolioError> {
        let active_model = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email),
            role: Set(input.role.as_str().to_string()),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        user_to_domain(model)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, PortfolioError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        model.map(user_to_domain).transpose()
    }

    async fn list_users(&self) -> Result<Vec<User>, PortfolioError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        models.into_iter().map(user_to_domain).collect()
    }

    async fn create_folder(&self, input: NewFolder) -> Result<Folder, PortfolioError> {
        let active_model = folders::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            cohort_id: Set(input.cohort_id),
            name: Set(input.name),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        Ok(folder_to_domain(model))
    }

    async fn find_folder(&self, id: Uuid) -> Result<Option<Folder>, PortfolioError> {
        let model = folders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        Ok(model.map(folder_to_domain))
    }

    async fn list_folders(&self, user_id: Option<Uuid>) -> Result<Vec<Folder>, PortfolioError> {
        let mut query = folders::Entity::find();
        if let Some(user_id) = user_id {
            query = query.filter(folders::Column::UserId.eq(user_id));
        }

        let models = query
            .order_by_desc(folders::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        Ok(models.into_iter().map(folder_to_domain).collect())
    }

    async fn create_file(&self, input: NewFileRecord) -> Result<FileRecord, PortfolioError> {
        let active_model = files::ActiveModel {
            id: Set(input.id),
            folder_id: Set(input.folder_id),
            storage_key: Set(input.storage_key),
            name: Set(input.name),
            size: Set(input.size),
            mime_type: Set(input.mime_type),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        Ok(file_to_domain(model))
    }

    async fn find_file(&self, id: Uuid) -> Result<Option<FileRecord>, PortfolioError> {
        let model = files::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        Ok(model.map(file_to_domain))
    }

    async fn list_files(&self, folder_id: Uuid) -> Result<Vec<FileRecord>, PortfolioError> {
        let models = files::Entity::find()
            .filter(files::Column::FolderId.eq(folder_id))
            .order_by_desc(files::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        Ok(models.into_iter().map(file_to_domain).collect())
    }

    async fn delete_file(&self, id: Uuid) -> Result<bool, PortfolioError> {
        let result = files::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| PortfolioError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database user to domain user.
fn user_to_domain(model: users::Model) -> Result<User, PortfolioError> {
    let role = Role::parse(&model.role)
        .ok_or_else(|| PortfolioError::repository(format!("unknown role: {}", model.role)))?;

    Ok(User {
        id: model.id,
        name: model.name,
        email: model.email,
        role,
        created_at: model.created_at.with_timezone(&Utc),
    })
}

fn folder_to_domain(model: folders::Model) -> Folder {
    Folder {
        id: model.id,
        user_id: model.user_id,
        cohort_id: model.cohort_id,
        name: model.name,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

fn file_to_domain(model: files::Model) -> FileRecord {
    FileRecord {
        id: model.id,
        folder_id: model.folder_id,
        storage_key: model.storage_key,
        name: model.name,
        size: model.size,
        mime_type: model.mime_type,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
