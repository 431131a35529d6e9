//! API route definitions.

pub mod annotation;
pub mod ci;
pub mod health;
pub mod logging;
pub mod processing;
pub mod settings;
pub mod videos;

use axum::Router;

use crate::api::openapi;
use crate::api::server::AppState;

/// Create the main API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/health", health::router())
        .nest("/api/settings", settings::router())
        .nest("/api/ci", ci::router())
        .nest("/api/processing", processing::router())
        .nest("/api/annotation", annotation::router())
        .nest("/api/videos", videos::router())
        .nest("/api/logging", logging::router())
        .merge(openapi::router())
        .with_state(state)
}
