//! yoko-api library interface
//!
//! Exposes the router and state so integration tests can drive the service
//! without binding a socket.

pub mod analytics;
pub mod api;
pub mod db;
pub mod error;
pub mod extract;
pub mod mailer;
pub mod matching;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::mailer::Mailer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub mailer: Mailer,
}

impl AppState {
    pub fn new(db: SqlitePool, mailer: Mailer) -> Self {
        Self { db, mailer }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::topic_routes())
        .merge(api::company_routes())
        .merge(api::submission_routes())
        .merge(api::stats_routes())
        .merge(api::confirmation_routes())
        .merge(api::reference_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
