//! Settings database model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Identifier of the singleton settings row.
pub const DEFAULT_SETTINGS_ID: &str = "default";

/// Default annotation lookup cache TTL in milliseconds.
pub const DEFAULT_ANNOTATION_CACHE_TTL_MS: i64 = 5000;

/// Remote system credentials, stored as a single row.
#[derive(Clone, FromRow, Serialize, Deserialize)]
pub struct SettingsDbModel {
    pub id: String,
    pub annotation_url: Option<String>,
    pub annotation_username: Option<String>,
    pub annotation_secret: Option<String>,
    pub annotation_cache_ttl_ms: i64,
    pub ci_url: Option<String>,
    pub ci_username: Option<String>,
    pub ci_secret: Option<String>,
    /// Unix epoch milliseconds
    pub updated_at: i64,
}

impl Default for SettingsDbModel {
    fn default() -> Self {
        Self {
            id: DEFAULT_SETTINGS_ID.to_string(),
            annotation_url: None,
            annotation_username: None,
            annotation_secret: None,
            annotation_cache_ttl_ms: DEFAULT_ANNOTATION_CACHE_TTL_MS,
            ci_url: None,
            ci_username: None,
            ci_secret: None,
            updated_at: crate::database::time::now_ms(),
        }
    }
}

impl std::fmt::Debug for SettingsDbModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsDbModel")
            .field("id", &self.id)
            .field("annotation_url", &self.annotation_url)
            .field("annotation_username", &self.annotation_username)
            .field("annotation_secret", &self.annotation_secret.as_ref().map(|_| "***"))
            .field("annotation_cache_ttl_ms", &self.annotation_cache_ttl_ms)
            .field("ci_url", &self.ci_url)
            .field("ci_username", &self.ci_username)
            .field("ci_secret", &self.ci_secret.as_ref().map(|_| "***"))
            .field("updated_at", &self.updated_at)
            .finish()
    }
}
