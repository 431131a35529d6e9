//! Settings repository.

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::database::models::{
    DEFAULT_ANNOTATION_CACHE_TTL_MS, DEFAULT_SETTINGS_ID, SettingsDbModel,
};
use crate::database::retry::retry_on_sqlite_busy;
use crate::database::time::now_ms;
use crate::{Error, Result};

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Load the settings row, creating it with defaults on first access.
    async fn get_or_create(&self) -> Result<SettingsDbModel>;

    /// Persist the settings row and return the stored value.
    async fn update(&self, settings: &SettingsDbModel) -> Result<SettingsDbModel>;
}

pub struct SqlxSettingsRepository {
    pool: SqlitePool,
    write_pool: SqlitePool,
}

impl SqlxSettingsRepository {
    pub fn new(pool: SqlitePool, write_pool: SqlitePool) -> Self {
        Self { pool, write_pool }
    }

    async fn fetch(&self) -> Result<Option<SettingsDbModel>> {
        let settings = sqlx::query_as::<_, SettingsDbModel>("SELECT * FROM settings WHERE id = ?")
            .bind(DEFAULT_SETTINGS_ID)
            .fetch_optional(&self.pool)
            .await?;
        Ok(settings)
    }
}

#[async_trait]
impl SettingsRepository for SqlxSettingsRepository {
    async fn get_or_create(&self) -> Result<SettingsDbModel> {
        if let Some(settings) = self.fetch().await? {
            return Ok(settings);
        }

        retry_on_sqlite_busy("create_default_settings", || async {
            sqlx::query(
                "INSERT OR IGNORE INTO settings (id, annotation_cache_ttl_ms, updated_at) VALUES (?, ?, ?)",
            )
            .bind(DEFAULT_SETTINGS_ID)
            .bind(DEFAULT_ANNOTATION_CACHE_TTL_MS)
            .bind(now_ms())
            .execute(&self.write_pool)
            .await?;
            Ok(())
        })
        .await?;

        self.fetch()
            .await?
            .ok_or_else(|| Error::not_found("Settings", DEFAULT_SETTINGS_ID))
    }

    async fn update(&self, settings: &SettingsDbModel) -> Result<SettingsDbModel> {
        let updated_at = now_ms();
        retry_on_sqlite_busy("update_settings", || async {
            sqlx::query(
                r#"
                INSERT INTO settings (
                    id, annotation_url, annotation_username, annotation_secret,
                    annotation_cache_ttl_ms, ci_url, ci_username, ci_secret, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(id) DO UPDATE SET
                    annotation_url = excluded.annotation_url,
                    annotation_username = excluded.annotation_username,
                    annotation_secret = excluded.annotation_secret,
                    annotation_cache_ttl_ms = excluded.annotation_cache_ttl_ms,
                    ci_url = excluded.ci_url,
                    ci_username = excluded.ci_username,
                    ci_secret = excluded.ci_secret,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(DEFAULT_SETTINGS_ID)
            .bind(&settings.annotation_url)
            .bind(&settings.annotation_username)
            .bind(&settings.annotation_secret)
            .bind(settings.annotation_cache_ttl_ms)
            .bind(&settings.ci_url)
            .bind(&settings.ci_username)
            .bind(&settings.ci_secret)
            .bind(updated_at)
            .execute(&self.write_pool)
            .await?;
            Ok(())
        })
        .await?;

        self.fetch()
            .await?
            .ok_or_else(|| Error::not_found("Settings", DEFAULT_SETTINGS_ID))
    }
}
