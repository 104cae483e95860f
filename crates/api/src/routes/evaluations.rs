//! Evaluation routes, plus by-key downloads for their attachments.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use folio_core::evaluation::{Evaluation, NewEvaluation};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::{DownloadResponse, TargetFields};
use crate::{AppState, error::ApiError};

/// Creates the evaluation routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/evaluations", post(create_evaluation))
        .route("/evaluations/upload-url", post(request_attachment_upload))
        .route("/folders/{id}/evaluations", get(list_evaluations))
        .route("/download", get(download_by_key))
}

/// Request body for creating an evaluation.
#[derive(Debug, Deserialize)]
pub struct CreateEvaluationRequest {
    /// Evaluated folder.
    pub folder_id: Uuid,
    /// Instructor ID.
    pub instructor_id: Uuid,
    /// Comments.
    #[serde(default)]
    pub comments: String,
    /// Score from 0 to 100.
    #[serde(default)]
    pub score: Option<i32>,
    /// Key returned by `/evaluations/upload-url`.
    #[serde(default)]
    pub attachment_key: Option<String>,
    /// Attachment display name.
    #[serde(default)]
    pub attachment_name: Option<String>,
}

/// Request body for an attachment upload URL.
#[derive(Debug, Deserialize)]
pub struct AttachmentUploadRequest {
    /// File name.
    pub name: String,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Response for an attachment upload URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentUploadResponse {
    /// URL to `PUT` the bytes to.
    pub upload_url: String,
    /// Key to store on the evaluation.
    pub key: String,
    /// Transfer details.
    #[serde(flatten)]
    pub target: TargetFields,
}

/// Query parameters for a by-key download.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// Storage key.
    pub key: Option<String>,
    /// Name for the saved file.
    pub name: Option<String>,
}

/// Response for an evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluationResponse {
    /// Evaluation ID.
    pub id: Uuid,
    /// Evaluated folder.
    pub folder_id: Uuid,
    /// Instructor ID.
    pub instructor_id: Uuid,
    /// Comments.
    pub comments: String,
    /// Score.
    pub score: Option<i32>,
    /// Attachment key.
    pub attachment_key: Option<String>,
    /// Attachment name.
    pub attachment_name: Option<String>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            id: evaluation.id,
            folder_id: evaluation.folder_id,
            instructor_id: evaluation.instructor_id,
            comments: evaluation.comments,
            score: evaluation.score,
            attachment_key: evaluation.attachment_key,
            attachment_name: evaluation.attachment_name,
            created_at: evaluation.created_at.to_rfc3339(),
        }
    }
}

/// POST `/evaluations`
async fn create_evaluation(
    State(state): State<AppState>,
    Json(payload): Json<CreateEvaluationRequest>,
) -> Result<(StatusCode, Json<EvaluationResponse>), ApiError> {
    let input = NewEvaluation {
        folder_id: payload.folder_id,
        instructor_id: payload.instructor_id,
        comments: payload.comments,
        score: payload.score,
        attachment_key: payload.attachment_key,
        attachment_name: payload.attachment_name,
    };

    let evaluation = state.evaluations().create(input).await.map_err(|e| {
        error!(folder_id = %payload.folder_id, error = %e, "Failed to create evaluation");
        ApiError::from(e)
    })?;

    Ok((StatusCode::CREATED, Json(evaluation.into())))
}

/// POST `/evaluations/upload-url`
async fn request_attachment_upload(
    State(state): State<AppState>,
    Json(payload): Json<AttachmentUploadRequest>,
) -> Result<Json<AttachmentUploadResponse>, ApiError> {
    let grant = state
        .evaluations()
        .request_attachment_upload(&payload.name, &payload.mime_type)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to request attachment upload URL");
            ApiError::from(e)
        })?;

    info!(key = %grant.key, "Attachment upload URL requested");
    let (upload_url, target) = TargetFields::split(grant.target);
    Ok(Json(AttachmentUploadResponse {
        upload_url,
        key: grant.key,
        target,
    }))
}

/// GET `/folders/{id}/evaluations`
async fn list_evaluations(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<Vec<EvaluationResponse>>, ApiError> {
    let evaluations = state
        .evaluations()
        .list_for_folder(folder_id)
        .await
        .map_err(|e| {
            error!(folder_id = %folder_id, error = %e, "Failed to list evaluations");
            ApiError::from(e)
        })?;

    Ok(Json(
        evaluations
            .into_iter()
            .map(EvaluationResponse::from)
            .collect(),
    ))
}

/// GET `/download?key=&name=`
/// Download URL for any key, saved as an attachment.
async fn download_by_key(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let target = state
        .evaluations()
        .download_by_key(query.key.as_deref().unwrap_or_default(), query.name.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to get download URL");
            ApiError::from(e)
        })?;

    Ok(Json(target.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{body_json, mock_state, proxied_state, send};
    use axum::{body::Body, http::Request};
    use chrono::Utc;
    use folio_db::entities::{evaluations, folders};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};

    #[tokio::test]
    async fn test_upload_url_uses_feedback_key() {
        let (state, _) = proxied_state(DatabaseConnection::default());

        let response = send(
            state,
            Request::builder()
                .method("POST")
                .uri("/api/evaluations/upload-url")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"name":"notes.pdf","type":"application/pdf"}"#))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let key = json["key"].as_str().unwrap();
        assert!(key.starts_with("feedback/"));
        assert!(key.ends_with("/notes.pdf"));
        assert!(
            json["uploadUrl"]
                .as_str()
                .unwrap()
                .starts_with("/proxy/upload?key=feedback%2F")
        );
    }

    #[tokio::test]
    async fn test_download_by_key_requires_key() {
        let response = send(
            mock_state(DatabaseConnection::default()),
            Request::builder()
                .uri("/api/download")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Missing key");
    }

    #[tokio::test]
    async fn test_download_by_key_defaults_name() {
        let (state, _) = proxied_state(DatabaseConnection::default());

        let response = send(
            state,
            Request::builder()
                .uri("/api/download?key=feedback%2Fabc%2Fnotes.pdf")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["downloadUrl"],
            "/proxy/download?key=feedback%2Fabc%2Fnotes.pdf&name=download"
        );
    }

    #[tokio::test]
    async fn test_create_evaluation_rejects_bad_score() {
        let response = send(
            mock_state(DatabaseConnection::default()),
            Request::builder()
                .method("POST")
                .uri("/api/evaluations")
                .header("Content-Type", "application/json")
                .body(Body::from(format!(
                    r#"{{"folder_id":"{}","instructor_id":"{}","comments":"ok","score":120}}"#,
                    Uuid::new_v4(),
                    Uuid::new_v4()
                )))
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_create_and_list_evaluations() {
        let folder = folders::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            cohort_id: None,
            name: "Portfolio".to_string(),
            created_at: Utc::now().fixed_offset(),
        };
        let evaluation = evaluations::Model {
            id: Uuid::new_v4(),
            folder_id: folder.id,
            instructor_id: Uuid::new_v4(),
            comments: "Clear structure".to_string(),
            score: Some(92),
            attachment_key: None,
            attachment_name: None,
            created_at: Utc::now().fixed_offset(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![folder.clone()]])
            .append_query_results([vec![evaluation.clone()], vec![evaluation.clone()]])
            .into_connection();
        let state = mock_state(db);

        let response = send(
            state.clone(),
            Request::builder()
                .method("POST")
                .uri("/api/evaluations")
                .header("Content-Type", "application/json")
                .body(Body::from(format!(
                    r#"{{"folder_id":"{}","instructor_id":"{}","comments":"Clear structure","score":92}}"#,
                    folder.id, evaluation.instructor_id
                )))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["score"], 92);

        let response = send(
            state,
            Request::builder()
                .uri(format!("/api/folders/{}/evaluations", folder.id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json[0]["comments"], "Clear structure");
    }
}
