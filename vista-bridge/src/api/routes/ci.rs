//! CI integration routes.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::server::AppState;
use crate::processing::{SendForAnnotationRequest, TriggerResponse};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CiStatusResponse {
    pub configured: bool,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(ci_status))
        .route("/trigger", post(trigger))
}

#[utoipa::path(
    get,
    path = "/api/ci/status",
    tag = "ci",
    responses((status = 200, description = "Whether CI credentials are set", body = CiStatusResponse))
)]
pub async fn ci_status(State(state): State<AppState>) -> Json<CiStatusResponse> {
    Json(CiStatusResponse {
        configured: state.build_gateway.is_configured().await,
    })
}

/// Send a video for annotation by triggering the matching CI job.
///
/// Failures are reported in the body with `success: false`.
#[utoipa::path(
    post,
    path = "/api/ci/trigger",
    tag = "ci",
    request_body = SendForAnnotationRequest,
    responses((status = 200, description = "Trigger outcome", body = TriggerResponse))
)]
pub async fn trigger(
    State(state): State<AppState>,
    Json(request): Json<SendForAnnotationRequest>,
) -> Json<TriggerResponse> {
    Json(state.trigger_service.send_for_annotation(&request).await)
}
