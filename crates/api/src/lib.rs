//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - JSON API routes under `/api`
//! - Transfer routes (proxy and mock) at the site root
//! - Error responses

pub mod error;
pub mod routes;

use axum::Router;
use folio_core::evaluation::EvaluationService;
use folio_core::portfolio::PortfolioService;
use folio_core::transfer::StorageStack;
use folio_db::{EvaluationRepository, PortfolioRepository};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Transfer broker and storage binding, chosen at startup.
    pub storage: StorageStack,
}

impl AppState {
    /// Portfolio service over this state's database and storage.
    #[must_use]
    pub fn portfolio(&self) -> PortfolioService<PortfolioRepository> {
        PortfolioService::new(
            Arc::new(PortfolioRepository::new((*self.db).clone())),
            self.storage.clone(),
        )
    }

    /// Evaluation service over this state's database and broker.
    #[must_use]
    pub fn evaluations(&self) -> EvaluationService<EvaluationRepository> {
        EvaluationService::new(
            Arc::new(EvaluationRepository::new((*self.db).clone())),
            self.storage.broker.clone(),
        )
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .merge(routes::transfer::routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
