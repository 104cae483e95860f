//! User routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use folio_core::portfolio::User;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(register_user))
        .route("/users/{id}", get(get_user))
}

/// Request body for registering a user.
#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
}

/// Response for a user.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// `participant` or `instructor`.
    pub role: &'static str,
    /// Created at timestamp (ISO 8601).
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.as_str(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// POST `/users`
/// Register a user, or return the one already registered with the email.
async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .portfolio()
        .register_user(&payload.name, &payload.email)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = %user.id, "User registered");
    Ok(Json(user.into()))
}

/// GET `/users`
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.portfolio().list_users().await.map_err(|e| {
        error!(error = %e, "Failed to list users");
        ApiError::from(e)
    })?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET `/users/{id}`
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.portfolio().get_user(id).await?;
    Ok(Json(user.into()))
}
