//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sqlx::SqlitePool;

use vista_bridge::config::{AnnotationCredentials, CiCredentials, CredentialsProvider};
use vista_bridge::database::{init_pool_with_size, run_migrations};
use vista_bridge::utils::http_client::build_client;

/// Credentials held in memory and editable mid-test.
#[derive(Default)]
pub struct StaticCredentials {
    annotation: Mutex<Option<AnnotationCredentials>>,
    ci: Mutex<Option<CiCredentials>>,
}

impl StaticCredentials {
    pub fn empty() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn annotation(url: &str) -> Arc<Self> {
        let provider = Self::empty();
        provider.set_annotation(Some(annotation_credentials(url, "alice", 5000)));
        provider
    }

    pub fn ci(url: &str) -> Arc<Self> {
        let provider = Self::empty();
        provider.set_ci(Some(CiCredentials {
            url: url.to_string(),
            username: "bot".to_string(),
            secret: "token".to_string(),
        }));
        provider
    }

    pub fn set_annotation(&self, credentials: Option<AnnotationCredentials>) {
        *self.annotation.lock() = credentials;
    }

    pub fn set_ci(&self, credentials: Option<CiCredentials>) {
        *self.ci.lock() = credentials;
    }
}

#[async_trait]
impl CredentialsProvider for StaticCredentials {
    async fn annotation_credentials(&self) -> Option<AnnotationCredentials> {
        self.annotation.lock().clone()
    }

    async fn ci_credentials(&self) -> Option<CiCredentials> {
        self.ci.lock().clone()
    }
}

pub fn annotation_credentials(url: &str, username: &str, cache_ttl_ms: u64) -> AnnotationCredentials {
    AnnotationCredentials {
        url: url.to_string(),
        username: username.to_string(),
        secret: "pw".to_string(),
        cache_ttl_ms,
    }
}

pub fn http() -> reqwest::Client {
    build_client(Duration::from_secs(5), 2)
}

/// In-memory database with migrations applied. One connection, so every
/// query sees the same database.
pub async fn memory_pool() -> SqlitePool {
    let pool = init_pool_with_size("sqlite::memory:", 1).await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
