//! HTTP surface exercised through the full router.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::memory_pool;
use vista_bridge::api::{ApiServer, ApiServerConfig, AppState};
use vista_bridge::config::AppConfig;
use vista_bridge::services::ServiceContainer;

async fn app() -> Router {
    let pool = memory_pool().await;
    let container = ServiceContainer::new(pool.clone(), pool, &AppConfig::default());
    let state = AppState::from_container(&container);
    ApiServer::new(ApiServerConfig::default(), state).build_router()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn roi_request(resource_path: &str) -> Value {
    json!({
        "resourcePath": resource_path,
        "method": "roi",
        "project": "Belts",
        "org": "vision"
    })
}

#[tokio::test]
async fn test_health_reports_uptime() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_secs"].is_u64());
}

#[tokio::test]
async fn test_settings_update_never_echoes_secrets() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annotationSecretSet"], false);
    assert_eq!(body["annotationCacheTtlMs"], 5000);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({
            "annotationUrl": "http://cvat.local",
            "annotationUsername": "alice",
            "annotationSecret": "hunter2"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["annotationUrl"], "http://cvat.local");
    assert_eq!(body["annotationSecretSet"], true);
    assert!(!body.to_string().contains("hunter2"));

    // absent fields are kept
    let (_, body) = send(&app, "PUT", "/api/settings", Some(json!({"ciUrl": "http://ci"}))).await;
    assert_eq!(body["annotationUsername"], "alice");
    assert_eq!(body["ciUrl"], "http://ci");
}

#[tokio::test]
async fn test_negative_cache_ttl_is_rejected() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({"annotationCacheTtlMs": -1})),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_trigger_without_ci_credentials_fails_softly() {
    let app = app().await;

    let (_, body) = send(&app, "GET", "/api/ci/status", None).await;
    assert_eq!(body["configured"], false);

    let (status, body) = send(&app, "POST", "/api/ci/trigger", Some(roi_request("a/cam1.mp4"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "CI server not configured");
    assert_eq!(body["jobName"], "pt-models/yolo_roi_extractor");
}

#[tokio::test]
async fn test_trigger_requires_resource_path() {
    let app = app().await;
    let (_, body) = send(&app, "POST", "/api/ci/trigger", Some(roi_request(""))).await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "resourcePath is required");
}

#[tokio::test]
async fn test_triggered_video_is_tracked_until_removed() {
    let ci = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/crumbIssuer/api/json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&ci)
        .await;
    Mock::given(method("POST"))
        .and(path("/job/pt-models/job/yolo_roi_extractor/buildWithParameters"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&ci)
        .await;

    let app = app().await;
    send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({"ciUrl": ci.uri(), "ciUsername": "bot", "ciSecret": "token"})),
    )
    .await;

    let (_, body) = send(&app, "GET", "/api/ci/status", None).await;
    assert_eq!(body["configured"], true);

    let (_, body) = send(&app, "POST", "/api/ci/trigger", Some(roi_request("a/cam1.mp4"))).await;
    assert_eq!(body["success"], true);

    let (status, body) = send(&app, "GET", "/api/processing", None).await;
    assert_eq!(status, StatusCode::OK);
    let records = body.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["resourcePath"], "a/cam1.mp4");
    assert_eq!(records[0]["status"], "queued");
    assert_eq!(records[0]["triggerMethod"], "roi");

    let (_, body) = send(
        &app,
        "POST",
        "/api/videos/decorate",
        Some(json!({"paths": ["a/cam1.mp4", "a/cam2.mp4"]})),
    )
    .await;
    assert_eq!(body["a/cam1.mp4"]["processing"]["status"], "queued");
    assert_eq!(body["a/cam1.mp4"]["annotation"]["exists"], false);
    assert!(body["a/cam2.mp4"].get("processing").is_none());

    let id = records[0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(&app, "DELETE", &format!("/api/processing/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "DELETE", &format!("/api/processing/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_annotation_status_without_credentials() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/annotation/status?filename=cam1.mp4", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["exists"], false);

    let (_, body) = send(
        &app,
        "POST",
        "/api/annotation/status",
        Some(json!({"filenames": ["cam1.mp4", "cam2.mp4"]})),
    )
    .await;
    assert_eq!(body["cam1.mp4"]["exists"], false);
    assert_eq!(body["cam2.mp4"]["occurrences"], json!([]));
}

#[tokio::test]
async fn test_logging_filter_needs_initialized_logging() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/logging/filter", None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/api/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/api/ci/trigger").is_some());
}
