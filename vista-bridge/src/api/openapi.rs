//! OpenAPI documentation configuration.
//!
//! The generated document is served at `/api/openapi.json`.

use axum::{Json, Router, routing::get};
use utoipa::OpenApi;

use crate::annotation::{AnnotationOccurrence, AnnotationStatus};
use crate::api::error::ApiErrorResponse;
use crate::api::routes::annotation::BatchStatusRequest;
use crate::api::routes::ci::CiStatusResponse;
use crate::api::routes::health::HealthResponse;
use crate::api::routes::logging::{LoggingFilterResponse, ModuleInfo, UpdateFilterRequest};
use crate::api::routes::videos::DecorateRequest;
use crate::api::server::AppState;
use crate::config::{SettingsPatch, SettingsView};
use crate::database::models::{ProcessingStatus, TriggerMethod};
use crate::processing::{
    ProcessingInfo, ProcessingRecordView, SendForAnnotationRequest, TriggerResponse,
};
use crate::services::VideoDecoration;

/// OpenAPI documentation for the vista-bridge API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "vista-bridge API",
        version = "0.1.0",
        description = "Annotation status lookups, CI build triggering and processing state for the video dashboard.",
        license(name = "MIT OR Apache-2.0")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    tags(
        (name = "health", description = "Health check endpoint"),
        (name = "settings", description = "Remote credential settings"),
        (name = "ci", description = "CI status and build triggering"),
        (name = "processing", description = "Videos handed off for annotation"),
        (name = "annotation", description = "Annotation task lookups"),
        (name = "videos", description = "Listing decoration"),
        (name = "logging", description = "Logging configuration endpoints")
    ),
    paths(
        crate::api::routes::health::health_check,
        crate::api::routes::settings::get_settings,
        crate::api::routes::settings::update_settings,
        crate::api::routes::ci::ci_status,
        crate::api::routes::ci::trigger,
        crate::api::routes::processing::list_active,
        crate::api::routes::processing::remove_record,
        crate::api::routes::annotation::video_status,
        crate::api::routes::annotation::videos_status,
        crate::api::routes::videos::decorate,
        crate::api::routes::logging::get_filter,
        crate::api::routes::logging::update_filter,
    ),
    components(
        schemas(
            ApiErrorResponse,
            HealthResponse,
            SettingsView,
            SettingsPatch,
            CiStatusResponse,
            SendForAnnotationRequest,
            TriggerResponse,
            TriggerMethod,
            ProcessingStatus,
            ProcessingInfo,
            ProcessingRecordView,
            AnnotationOccurrence,
            AnnotationStatus,
            BatchStatusRequest,
            DecorateRequest,
            VideoDecoration,
            LoggingFilterResponse,
            ModuleInfo,
            UpdateFilterRequest,
        )
    )
)]
pub struct ApiDoc;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/settings",
            "/api/ci/status",
            "/api/ci/trigger",
            "/api/processing",
            "/api/processing/{id}",
            "/api/annotation/status",
            "/api/videos/decorate",
            "/api/logging/filter",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
