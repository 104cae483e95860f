//! API route definitions.

use axum::Router;
use chrono::{DateTime, Utc};
use folio_core::transfer::TransferTarget;
use serde::Serialize;
use std::collections::HashMap;

use crate::AppState;

pub mod evaluations;
pub mod files;
pub mod folders;
pub mod health;
pub mod transfer;
pub mod users;

/// Creates the JSON API router, mounted under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(users::routes())
        .merge(folders::routes())
        .merge(files::routes())
        .merge(evaluations::routes())
}

/// Transfer target fields shared by upload and download responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetFields {
    /// HTTP method the client must use.
    pub method: String,
    /// Headers the client request must carry.
    pub headers: HashMap<String, String>,
    /// Expiry of a signed URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// `direct_signed`, `proxied` or `mock`.
    pub mechanism: &'static str,
}

impl TargetFields {
    /// Split a target into its URL and the remaining fields.
    #[must_use]
    pub fn split(target: TransferTarget) -> (String, Self) {
        let fields = Self {
            method: target.method,
            headers: target.headers,
            expires_at: target.expires_at,
            mechanism: target.mechanism.as_str(),
        };
        (target.url, fields)
    }
}

/// Response carrying a download URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadResponse {
    /// URL to `GET`.
    pub download_url: String,
    /// Transfer details.
    #[serde(flatten)]
    pub target: TargetFields,
}

impl From<TransferTarget> for DownloadResponse {
    fn from(target: TransferTarget) -> Self {
        let (download_url, target) = TargetFields::split(target);
        Self {
            download_url,
            target,
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Router and state builders shared by route tests.

    use std::path::Path;
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, Response},
    };
    use bytes::Bytes;
    use folio_core::storage::{BindingProvider, OperatorBinding, StorageBinding};
    use folio_core::transfer::{MockProvider, ProxyProvider, StorageStack, TransferBroker};
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    use crate::{AppState, create_router};

    fn proxied_over(
        db: DatabaseConnection,
        binding: OperatorBinding,
    ) -> (AppState, Arc<OperatorBinding>) {
        let binding = Arc::new(binding);
        let stack = StorageStack::new(
            TransferBroker::new(Arc::new(ProxyProvider)),
            Some(Arc::clone(&binding) as Arc<dyn StorageBinding>),
        );
        (
            AppState {
                db: Arc::new(db),
                storage: stack,
            },
            binding,
        )
    }

    /// State with a proxied broker over a fresh memory binding.
    pub fn proxied_state(db: DatabaseConnection) -> (AppState, Arc<OperatorBinding>) {
        let binding =
            OperatorBinding::from_provider(&BindingProvider::Memory).expect("memory binding");
        proxied_over(db, binding)
    }

    /// State with a proxied broker over a filesystem binding rooted at `root`.
    pub fn fs_state(db: DatabaseConnection, root: &Path) -> (AppState, Arc<OperatorBinding>) {
        let binding =
            OperatorBinding::from_provider(&BindingProvider::local_fs(root)).expect("fs binding");
        proxied_over(db, binding)
    }

    /// State with the mock broker and no binding.
    pub fn mock_state(db: DatabaseConnection) -> AppState {
        AppState {
            db: Arc::new(db),
            storage: StorageStack::new(TransferBroker::new(Arc::new(MockProvider)), None),
        }
    }

    /// Send one request through the full router.
    pub async fn send(state: AppState, request: Request<Body>) -> Response<Body> {
        let app: Router = create_router(state);
        app.oneshot(request).await.unwrap()
    }

    /// Collect a response body.
    pub async fn body_bytes(response: Response<Body>) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    /// Collect a response body as JSON.
    pub async fn body_json(response: Response<Body>) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }
}
