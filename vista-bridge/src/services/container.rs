//! Service container for dependency injection.
//!
//! The ServiceContainer builds every service from the database pools and
//! process configuration and hands out shared references.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::annotation::AnnotationService;
use crate::ci::{BuildGateway, JobStatusPoller, JobStatusSource};
use crate::config::{AppConfig, ConfigService, CredentialsProvider};
use crate::database::repositories::{
    ProcessingRepository, SqlxProcessingRepository, SqlxSettingsRepository,
};
use crate::processing::{ProcessingRegistry, TriggerService};
use crate::utils::http_client::build_client;

use super::decorator::ListingDecorator;

/// Idle connections kept per remote host.
const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 8;

pub struct ServiceContainer {
    /// Read pool.
    pub pool: SqlitePool,
    /// Serialized write pool.
    pub write_pool: SqlitePool,
    pub config_service: Arc<ConfigService<SqlxSettingsRepository>>,
    pub annotation_service: Arc<AnnotationService>,
    pub build_gateway: Arc<BuildGateway>,
    pub job_poller: Arc<JobStatusPoller>,
    pub processing_registry: Arc<ProcessingRegistry>,
    pub trigger_service: Arc<TriggerService>,
    pub listing_decorator: Arc<ListingDecorator>,
    cancellation_token: CancellationToken,
}

impl ServiceContainer {
    pub fn new(pool: SqlitePool, write_pool: SqlitePool, config: &AppConfig) -> Self {
        info!("Initializing service container");

        let http = build_client(config.http_timeout, DEFAULT_POOL_MAX_IDLE_PER_HOST);

        let settings_repo = Arc::new(SqlxSettingsRepository::new(pool.clone(), write_pool.clone()));
        let config_service = Arc::new(ConfigService::new(settings_repo));
        let provider: Arc<dyn CredentialsProvider> = config_service.clone();

        let annotation_service = Arc::new(AnnotationService::new(provider.clone(), http.clone()));

        let job_poller = Arc::new(JobStatusPoller::new(provider.clone(), http.clone()));
        let build_gateway = Arc::new(BuildGateway::new(provider, http, job_poller.clone()));

        let processing_repo: Arc<dyn ProcessingRepository> = Arc::new(
            SqlxProcessingRepository::new(pool.clone(), write_pool.clone()),
        );
        let source: Arc<dyn JobStatusSource> = job_poller.clone();
        let processing_registry = Arc::new(ProcessingRegistry::new(processing_repo, source));

        let trigger_service = Arc::new(TriggerService::new(
            build_gateway.clone(),
            processing_registry.clone(),
            config.jobs.clone(),
        ));
        let listing_decorator = Arc::new(ListingDecorator::new(
            annotation_service.clone(),
            processing_registry.clone(),
        ));

        info!("Service container initialized");

        Self {
            pool,
            write_pool,
            config_service,
            annotation_service,
            build_gateway,
            job_poller,
            processing_registry,
            trigger_service,
            listing_decorator,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Token cancelled when shutdown starts.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Signal shutdown and close the database pools.
    pub async fn shutdown(&self) {
        info!("Shutting down services");
        self.cancellation_token.cancel();

        self.write_pool.close().await;
        self.pool.close().await;
        info!("Database pools closed");
    }
}
