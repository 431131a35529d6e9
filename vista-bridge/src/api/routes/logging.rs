//! Logging API routes.
//!
//! Runtime view and update of the tracing filter.

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::{ApiError, ApiErrorResponse, ApiResult};
use crate::api::server::AppState;
use crate::logging::available_modules;

#[derive(Debug, Serialize, ToSchema)]
pub struct ModuleInfo {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoggingFilterResponse {
    pub filter: String,
    pub available_modules: Vec<ModuleInfo>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFilterRequest {
    /// EnvFilter directive, e.g. `vista_bridge=debug,sqlx=warn`.
    pub filter: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/filter", get(get_filter).put(update_filter))
}

fn filter_response(filter: String) -> LoggingFilterResponse {
    LoggingFilterResponse {
        filter,
        available_modules: available_modules()
            .into_iter()
            .map(|(name, description)| ModuleInfo {
                name: name.to_string(),
                description: description.to_string(),
            })
            .collect(),
    }
}

#[utoipa::path(
    get,
    path = "/api/logging/filter",
    tag = "logging",
    responses(
        (status = 200, description = "Active filter", body = LoggingFilterResponse),
        (status = 503, description = "Logging not initialized", body = ApiErrorResponse)
    )
)]
pub async fn get_filter(State(state): State<AppState>) -> ApiResult<Json<LoggingFilterResponse>> {
    let logging = state
        .logging_config
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Logging configuration not available"))?;
    Ok(Json(filter_response(logging.get_filter())))
}

#[utoipa::path(
    put,
    path = "/api/logging/filter",
    tag = "logging",
    request_body = UpdateFilterRequest,
    responses(
        (status = 200, description = "Filter applied", body = LoggingFilterResponse),
        (status = 422, description = "Invalid directive", body = ApiErrorResponse),
        (status = 503, description = "Logging not initialized", body = ApiErrorResponse)
    )
)]
pub async fn update_filter(
    State(state): State<AppState>,
    Json(request): Json<UpdateFilterRequest>,
) -> ApiResult<Json<LoggingFilterResponse>> {
    let logging = state
        .logging_config
        .as_ref()
        .ok_or_else(|| ApiError::service_unavailable("Logging configuration not available"))?;
    logging.set_filter(&request.filter)?;
    Ok(Json(filter_response(logging.get_filter())))
}
