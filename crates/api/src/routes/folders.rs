//! Folder routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use folio_core::portfolio::Folder;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Creates the folder routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/folders", get(list_folders).post(create_folder))
}

/// Request body for creating a folder.
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    /// Folder name.
    pub name: String,
    /// Owning user.
    pub user_id: Uuid,
    /// Cohort, if any.
    #[serde(default)]
    pub cohort_id: Option<Uuid>,
}

/// Query parameters for listing folders.
#[derive(Debug, Deserialize)]
pub struct ListFoldersQuery {
    /// Only folders owned by this user.
    pub user_id: Option<Uuid>,
}

/// Response for a folder.
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    /// Folder ID.
    pub id: Uuid,
    /// Folder name.
    pub name: String,
    /// Owning user.
    pub user_id: Uuid,
    /// Cohort, if any.
    pub cohort_id: Option<Uuid>,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            user_id: folder.user_id,
            cohort_id: folder.cohort_id,
            created_at: folder.created_at.to_rfc3339(),
        }
    }
}

/// POST `/folders`
async fn create_folder(
    State(state): State<AppState>,
    Json(payload): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<FolderResponse>), ApiError> {
    let folder = state
        .portfolio()
        .create_folder(payload.user_id, payload.cohort_id, &payload.name)
        .await
        .map_err(|e| {
            error!(user_id = %payload.user_id, error = %e, "Failed to create folder");
            ApiError::from(e)
        })?;

    info!(folder_id = %folder.id, user_id = %folder.user_id, "Folder created");
    Ok((StatusCode::CREATED, Json(folder.into())))
}

/// GET `/folders?user_id=`
async fn list_folders(
    State(state): State<AppState>,
    Query(query): Query<ListFoldersQuery>,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
    let folders = state
        .portfolio()
        .list_folders(query.user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list folders");
            ApiError::from(e)
        })?;

    Ok(Json(folders.into_iter().map(FolderResponse::from).collect()))
}
