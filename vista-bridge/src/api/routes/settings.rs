//! Remote credential settings.

use axum::{Json, Router, extract::State, routing::get};

use crate::api::error::{ApiErrorResponse, ApiResult};
use crate::api::server::AppState;
use crate::config::{SettingsPatch, SettingsView};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(update_settings))
}

/// Current settings. Secrets are reported only as `*SecretSet` flags.
#[utoipa::path(
    get,
    path = "/api/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Current settings", body = SettingsView),
        (status = 500, description = "Database error", body = ApiErrorResponse)
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<Json<SettingsView>> {
    let settings = state.config_service.get_settings().await?;
    Ok(Json(SettingsView::from(&settings)))
}

/// Partially update settings. Absent fields are kept, empty strings clear.
#[utoipa::path(
    put,
    path = "/api/settings",
    tag = "settings",
    request_body = SettingsPatch,
    responses(
        (status = 200, description = "Updated settings", body = SettingsView),
        (status = 422, description = "Invalid value", body = ApiErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> ApiResult<Json<SettingsView>> {
    let settings = state.config_service.update_settings(patch).await?;
    Ok(Json(SettingsView::from(&settings)))
}
