//! Configuration service implementation.
//!
//! The ConfigService owns the persisted settings row and acts as the
//! credentials source for the annotation and CI integrations. Every call
//! re-reads storage so edits made through the settings API apply to the
//! next remote call.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::database::models::SettingsDbModel;
use crate::database::repositories::SettingsRepository;
use crate::{Error, Result};

use super::types::{AnnotationCredentials, CiCredentials, SettingsPatch};

/// Source of remote credentials. May change between calls.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    async fn annotation_credentials(&self) -> Option<AnnotationCredentials>;

    async fn ci_credentials(&self) -> Option<CiCredentials>;
}

pub struct ConfigService<R>
where
    R: SettingsRepository + Send + Sync,
{
    settings_repo: Arc<R>,
}

impl<R> ConfigService<R>
where
    R: SettingsRepository + Send + Sync,
{
    pub fn new(settings_repo: Arc<R>) -> Self {
        Self { settings_repo }
    }

    pub async fn get_settings(&self) -> Result<SettingsDbModel> {
        self.settings_repo.get_or_create().await
    }

    /// Apply a partial update and persist it.
    pub async fn update_settings(&self, patch: SettingsPatch) -> Result<SettingsDbModel> {
        if let Some(ttl) = patch.annotation_cache_ttl_ms
            && ttl < 0
        {
            return Err(Error::validation(
                "annotationCacheTtlMs must be zero or positive",
            ));
        }

        let mut settings = self.settings_repo.get_or_create().await?;
        patch.apply_to(&mut settings);
        let stored = self.settings_repo.update(&settings).await?;

        tracing::info!(
            annotation_configured = AnnotationCredentials::from_settings(&stored).is_some(),
            ci_configured = CiCredentials::from_settings(&stored).is_some(),
            "Settings updated"
        );
        Ok(stored)
    }
}

#[async_trait]
impl<R> CredentialsProvider for ConfigService<R>
where
    R: SettingsRepository + Send + Sync,
{
    async fn annotation_credentials(&self) -> Option<AnnotationCredentials> {
        match self.settings_repo.get_or_create().await {
            Ok(settings) => AnnotationCredentials::from_settings(&settings),
            Err(e) => {
                warn!(error = %e, "Failed to load annotation credentials");
                None
            }
        }
    }

    async fn ci_credentials(&self) -> Option<CiCredentials> {
        match self.settings_repo.get_or_create().await {
            Ok(settings) => CiCredentials::from_settings(&settings),
            Err(e) => {
                warn!(error = %e, "Failed to load CI credentials");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::repositories::SqlxSettingsRepository;
    use crate::database::{init_pool_with_size, run_migrations};

    async fn service() -> ConfigService<SqlxSettingsRepository> {
        let pool = init_pool_with_size("sqlite::memory:", 1).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let repo = SqlxSettingsRepository::new(pool.clone(), pool);
        ConfigService::new(Arc::new(repo))
    }

    #[tokio::test]
    async fn test_fresh_settings_are_unconfigured() {
        let service = service().await;
        let settings = service.get_settings().await.unwrap();
        assert_eq!(settings.annotation_cache_ttl_ms, 5000);
        assert!(service.annotation_credentials().await.is_none());
        assert!(service.ci_credentials().await.is_none());
    }

    #[tokio::test]
    async fn test_update_makes_credentials_available() {
        let service = service().await;
        service
            .update_settings(SettingsPatch {
                ci_url: Some("http://ci.local/".to_string()),
                ci_username: Some("bot".to_string()),
                ci_secret: Some("token".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let creds = service.ci_credentials().await.unwrap();
        assert_eq!(creds.url, "http://ci.local");
        assert_eq!(creds.username, "bot");
        assert!(service.annotation_credentials().await.is_none());
    }

    #[tokio::test]
    async fn test_negative_ttl_is_rejected() {
        let service = service().await;
        let err = service
            .update_settings(SettingsPatch {
                annotation_cache_ttl_ms: Some(-1),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
