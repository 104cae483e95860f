//! Evaluation repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{evaluations, folders};
use folio_core::evaluation::{
    Evaluation, EvaluationError, EvaluationRepository as EvaluationRepoTrait, NewEvaluation,
};

/// Evaluation repository implementation.
#[derive(Debug, Clone)]
pub struct EvaluationRepository {
    db: DatabaseConnection,
}

impl EvaluationRepository {
    /// Create a new evaluation repository.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl EvaluationRepoTrait for EvaluationRepository {
    async fn folder_exists(&self, folder_id: Uuid) -> Result<bool, EvaluationError> {
        let folder = folders::Entity::find_by_id(folder_id)
            .one(&self.db)
            .await
            .map_err(|e| EvaluationError::repository(e.to_string()))?;

        Ok(folder.is_some())
    }

    async fn create(&self, input: NewEvaluation) -> Result<Evaluation, EvaluationError> {
        let active_model = evaluations::ActiveModel {
            id: Set(Uuid::new_v4()),
            folder_id: Set(input.folder_id),
            instructor_id: Set(input.instructor_id),
            comments: Set(input.comments),
            score: Set(input.score),
            attachment_key: Set(input.attachment_key),
            attachment_name: Set(input.attachment_name),
            created_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| EvaluationError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn list_for_folder(&self, folder_id: Uuid) -> Result<Vec<Evaluation>, EvaluationError> {
        let models = evaluations::Entity::find()
            .filter(evaluations::Column::FolderId.eq(folder_id))
            .order_by_desc(evaluations::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| EvaluationError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }
}

/// Convert database model to domain model.
fn to_domain(model: evaluations::Model) -> Evaluation {
    Evaluation {
        id: model.id,
        folder_id: model.folder_id,
        instructor_id: model.instructor_id,
        comments: model.comments,
        score: model.score,
        attachment_key: model.attachment_key,
        attachment_name: model.attachment_name,
        created_at: model.created_at.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn evaluation_model(folder_id: Uuid, score: Option<i32>) -> evaluations::Model {
        evaluations::Model {
            id: Uuid::new_v4(),
            folder_id,
            instructor_id: Uuid::new_v4(),
            comments: "Strong work".to_string(),
            score,
            attachment_key: Some("feedback/abc/notes.pdf".to_string()),
            attachment_name: Some("notes.pdf".to_string()),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[tokio::test]
    async fn test_folder_exists() {
        let folder = folders::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            cohort_id: None,
            name: "Portfolio".to_string(),
            created_at: Utc::now().fixed_offset(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![folder.clone()], Vec::new()])
            .into_connection();
        let repo = EvaluationRepository::new(db);

        assert!(repo.folder_exists(folder.id).await.unwrap());
        assert!(!repo.folder_exists(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_maps_attachment_fields() {
        let folder_id = Uuid::new_v4();
        let model = evaluation_model(folder_id, Some(88));
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model.clone()]])
            .into_connection();
        let repo = EvaluationRepository::new(db);

        let evaluation = repo
            .create(NewEvaluation {
                folder_id,
                instructor_id: model.instructor_id,
                comments: model.comments.clone(),
                score: Some(88),
                attachment_key: model.attachment_key.clone(),
                attachment_name: model.attachment_name.clone(),
            })
            .await
            .unwrap();

        assert_eq!(evaluation.id, model.id);
        assert_eq!(evaluation.score, Some(88));
        assert_eq!(
            evaluation.attachment_key.as_deref(),
            Some("feedback/abc/notes.pdf")
        );
    }

    #[tokio::test]
    async fn test_list_for_folder() {
        let folder_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                evaluation_model(folder_id, None),
                evaluation_model(folder_id, Some(70)),
            ]])
            .into_connection();
        let repo = EvaluationRepository::new(db);

        let evaluations = repo.list_for_folder(folder_id).await.unwrap();
        assert_eq!(evaluations.len(), 2);
        assert_eq!(evaluations[1].score, Some(70));
    }
}
