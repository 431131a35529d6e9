//! Processing registry routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};

use crate::api::error::{ApiErrorResponse, ApiResult};
use crate::api::server::AppState;
use crate::processing::ProcessingRecordView;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_active))
        .route("/{id}", delete(remove_record))
}

/// Queued and building records, newest first.
#[utoipa::path(
    get,
    path = "/api/processing",
    tag = "processing",
    responses(
        (status = 200, description = "Active records", body = Vec<ProcessingRecordView>),
        (status = 500, description = "Database error", body = ApiErrorResponse)
    )
)]
pub async fn list_active(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ProcessingRecordView>>> {
    let records = state.processing_registry.get_all_active().await?;
    Ok(Json(records.into_iter().map(ProcessingRecordView::from).collect()))
}

#[utoipa::path(
    delete,
    path = "/api/processing/{id}",
    tag = "processing",
    params(("id" = String, Path, description = "Record id")),
    responses(
        (status = 204, description = "Record removed"),
        (status = 404, description = "No such record", body = ApiErrorResponse)
    )
)]
pub async fn remove_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state.processing_registry.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
