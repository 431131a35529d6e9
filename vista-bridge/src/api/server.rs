//! API server setup and configuration.

use axum::Router;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::annotation::AnnotationService;
use crate::api::routes;
use crate::ci::BuildGateway;
use crate::config::ConfigService;
use crate::database::repositories::SqlxSettingsRepository;
use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use crate::processing::{ProcessingRegistry, TriggerService};
use crate::services::{ListingDecorator, ServiceContainer};

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub enable_cors: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
        }
    }
}

impl ApiServerConfig {
    /// Load from `API_BIND_ADDRESS` and `API_PORT`, falling back to defaults.
    pub fn from_env_or_default() -> Self {
        let mut config = Self::default();

        if let Ok(bind_address) = std::env::var("API_BIND_ADDRESS")
            && !bind_address.trim().is_empty()
        {
            config.bind_address = bind_address;
        }

        if let Ok(port) = std::env::var("API_PORT")
            && let Ok(parsed) = port.parse::<u16>()
        {
            config.port = parsed;
        }

        config
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub start_time: Instant,
    pub config_service: Arc<ConfigService<SqlxSettingsRepository>>,
    pub annotation_service: Arc<AnnotationService>,
    pub build_gateway: Arc<BuildGateway>,
    pub processing_registry: Arc<ProcessingRegistry>,
    pub trigger_service: Arc<TriggerService>,
    pub listing_decorator: Arc<ListingDecorator>,
    pub logging_config: Option<Arc<LoggingConfig>>,
}

impl AppState {
    pub fn from_container(container: &ServiceContainer) -> Self {
        Self {
            start_time: Instant::now(),
            config_service: container.config_service.clone(),
            annotation_service: container.annotation_service.clone(),
            build_gateway: container.build_gateway.clone(),
            processing_registry: container.processing_registry.clone(),
            trigger_service: container.trigger_service.clone(),
            listing_decorator: container.listing_decorator.clone(),
            logging_config: None,
        }
    }

    pub fn with_logging_config(mut self, config: Arc<LoggingConfig>) -> Self {
        self.logging_config = Some(config);
        self
    }
}

pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Stop the server when `token` is cancelled.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Full router with CORS and request tracing layers.
    pub fn build_router(&self) -> Router {
        let mut router = routes::create_router(self.state.clone());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router.layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request| {
                    if req.uri().path() == "/health" {
                        Span::none()
                    } else {
                        tracing::info_span!(
                            "http_request",
                            method = %req.method(),
                            uri = %req.uri(),
                        )
                    }
                })
                .on_response(
                    |res: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        if span.is_disabled() {
                            return;
                        }
                        tracing::debug!(
                            parent: span,
                            status = res.status().as_u16(),
                            latency_ms = latency.as_millis() as u64,
                            "response"
                        );
                    },
                ),
        )
    }

    /// Serve until the cancel token fires.
    pub async fn run(&self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .map_err(|e| Error::config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("API server listening on http://{}", addr);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("API server shutting down...");
            })
            .await?;

        Ok(())
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}
