//! Listing decoration for the video browser.

use std::collections::HashMap;

use axum::{Json, Router, extract::State, routing::post};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::server::AppState;
use crate::services::VideoDecoration;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecorateRequest {
    /// Resource paths of the listed videos.
    pub paths: Vec<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/decorate", post(decorate))
}

#[utoipa::path(
    post,
    path = "/api/videos/decorate",
    tag = "videos",
    request_body = DecorateRequest,
    responses((status = 200, description = "Decoration per resource path", body = HashMap<String, VideoDecoration>))
)]
pub async fn decorate(
    State(state): State<AppState>,
    Json(request): Json<DecorateRequest>,
) -> Json<HashMap<String, VideoDecoration>> {
    Json(state.listing_decorator.decorate(&request.paths).await)
}
