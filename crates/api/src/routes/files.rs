//! File routes.
//!
//! Requesting an upload records the file and returns a transfer target; the
//! client then sends the bytes to that target directly.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use folio_core::portfolio::{FileRecord, RequestUploadInput};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use super::{DownloadResponse, TargetFields};
use crate::{AppState, error::ApiError};

/// Creates the file routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/folders/{id}/files",
            get(list_files).post(request_upload),
        )
        .route("/files/{id}/download", get(download_file))
        .route("/files/{id}", delete(delete_file))
}

/// Request body for requesting an upload URL.
#[derive(Debug, Deserialize)]
pub struct RequestUploadRequest {
    /// Original file name.
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME type of the file.
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Response for an upload URL request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestUploadResponse {
    /// URL to `PUT` the bytes to.
    pub upload_url: String,
    /// Storage key of the object.
    pub key: String,
    /// ID of the recorded file.
    pub file_id: Uuid,
    /// Transfer details.
    #[serde(flatten)]
    pub target: TargetFields,
}

/// Response for a file record.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    /// File ID.
    pub id: Uuid,
    /// Folder ID.
    pub folder_id: Uuid,
    /// Storage key.
    pub storage_key: String,
    /// Original file name.
    pub name: String,
    /// Size in bytes.
    pub size: i64,
    /// MIME type.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

impl From<FileRecord> for FileResponse {
    fn from(file: FileRecord) -> Self {
        Self {
            id: file.id,
            folder_id: file.folder_id,
            storage_key: file.storage_key,
            name: file.name,
            size: file.size,
            mime_type: file.mime_type,
            created_at: file.created_at.to_rfc3339(),
        }
    }
}

/// POST `/folders/{id}/files`
/// Record a file and return where to upload it.
async fn request_upload(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
    Json(payload): Json<RequestUploadRequest>,
) -> Result<Json<RequestUploadResponse>, ApiError> {
    let input = RequestUploadInput {
        folder_id,
        name: payload.name,
        size: payload.size,
        mime_type: payload.mime_type,
    };

    let grant = state
        .portfolio()
        .request_upload(input)
        .await
        .map_err(|e| {
            error!(folder_id = %folder_id, error = %e, "Failed to request upload URL");
            ApiError::from(e)
        })?;

    info!(
        folder_id = %folder_id,
        file_id = %grant.file.id,
        mechanism = grant.target.mechanism.as_str(),
        "Upload URL requested"
    );

    let (upload_url, target) = TargetFields::split(grant.target);
    Ok(Json(RequestUploadResponse {
        upload_url,
        key: grant.file.storage_key,
        file_id: grant.file.id,
        target,
    }))
}

/// GET `/folders/{id}/files`
async fn list_files(
    State(state): State<AppState>,
    Path(folder_id): Path<Uuid>,
) -> Result<Json<Vec<FileResponse>>, ApiError> {
    let files = state.portfolio().list_files(folder_id).await.map_err(|e| {
        error!(folder_id = %folder_id, error = %e, "Failed to list files");
        ApiError::from(e)
    })?;

    Ok(Json(files.into_iter().map(FileResponse::from).collect()))
}

/// GET `/files/{id}/download`
/// Download URL shown inline under the original name.
async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Json<DownloadResponse>, ApiError> {
    let target = state
        .portfolio()
        .download_target(file_id)
        .await
        .map_err(|e| {
            error!(file_id = %file_id, error = %e, "Failed to get download URL");
            ApiError::from(e)
        })?;

    Ok(Json(target.into()))
}

/// DELETE `/files/{id}`
async fn delete_file(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let file = state.portfolio().delete_file(file_id).await.map_err(|e| {
        error!(file_id = %file_id, error = %e, "Failed to delete file");
        ApiError::from(e)
    })?;

    info!(file_id = %file_id, key = %file.storage_key, "File deleted");
    Ok(StatusCode::NO_CONTENT)
}
