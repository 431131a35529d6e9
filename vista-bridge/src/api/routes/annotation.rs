//! Annotation lookup routes.

use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::annotation::AnnotationStatus;
use crate::api::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::api::server::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct StatusQuery {
    /// Video file name, with or without extension.
    pub filename: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BatchStatusRequest {
    pub filenames: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/status", get(video_status).post(videos_status))
}

#[utoipa::path(
    get,
    path = "/api/annotation/status",
    tag = "annotation",
    params(StatusQuery),
    responses(
        (status = 200, description = "Annotation status of one video", body = AnnotationStatus),
        (status = 400, description = "Missing filename", body = ApiErrorResponse)
    )
)]
pub async fn video_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<AnnotationStatus>> {
    if query.filename.trim().is_empty() {
        return Err(ApiError::bad_request("filename is required"));
    }
    Ok(Json(
        state
            .annotation_service
            .check_video_status(&query.filename)
            .await,
    ))
}

/// Batch lookup keyed by the file names given.
#[utoipa::path(
    post,
    path = "/api/annotation/status",
    tag = "annotation",
    request_body = BatchStatusRequest,
    responses((status = 200, description = "Status per file name", body = HashMap<String, AnnotationStatus>))
)]
pub async fn videos_status(
    State(state): State<AppState>,
    Json(request): Json<BatchStatusRequest>,
) -> Json<HashMap<String, AnnotationStatus>> {
    Json(
        state
            .annotation_service
            .check_videos_status(&request.filenames)
            .await,
    )
}
