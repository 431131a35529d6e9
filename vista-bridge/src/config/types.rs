//! Credential and settings types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::database::models::SettingsDbModel;

/// Annotation platform credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct AnnotationCredentials {
    /// Base URL without trailing slash.
    pub url: String,
    pub username: String,
    pub secret: String,
    /// TTL for task lookup results.
    pub cache_ttl_ms: u64,
}

/// CI server credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct CiCredentials {
    /// Base URL without trailing slash.
    pub url: String,
    pub username: String,
    pub secret: String,
}

impl std::fmt::Debug for AnnotationCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationCredentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("secret", &"***")
            .field("cache_ttl_ms", &self.cache_ttl_ms)
            .finish()
    }
}

impl std::fmt::Debug for CiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CiCredentials")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("secret", &"***")
            .finish()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl AnnotationCredentials {
    /// Build credentials from the settings row; `None` if anything is missing.
    pub fn from_settings(settings: &SettingsDbModel) -> Option<Self> {
        let url = present(&settings.annotation_url)?;
        let username = present(&settings.annotation_username)?;
        let secret = settings
            .annotation_secret
            .as_deref()
            .filter(|s| !s.is_empty())?;
        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            secret: secret.to_string(),
            cache_ttl_ms: settings.annotation_cache_ttl_ms.max(0) as u64,
        })
    }
}

impl CiCredentials {
    pub fn from_settings(settings: &SettingsDbModel) -> Option<Self> {
        let url = present(&settings.ci_url)?;
        let username = present(&settings.ci_username)?;
        let secret = settings.ci_secret.as_deref().filter(|s| !s.is_empty())?;
        Some(Self {
            url: url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            secret: secret.to_string(),
        })
    }
}

/// Settings as returned to the dashboard. Secrets are never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub annotation_url: Option<String>,
    pub annotation_username: Option<String>,
    pub annotation_secret_set: bool,
    pub annotation_cache_ttl_ms: i64,
    pub ci_url: Option<String>,
    pub ci_username: Option<String>,
    pub ci_secret_set: bool,
    /// Unix epoch milliseconds
    pub updated_at: i64,
}

impl From<&SettingsDbModel> for SettingsView {
    fn from(settings: &SettingsDbModel) -> Self {
        Self {
            annotation_url: settings.annotation_url.clone(),
            annotation_username: settings.annotation_username.clone(),
            annotation_secret_set: settings
                .annotation_secret
                .as_deref()
                .is_some_and(|s| !s.is_empty()),
            annotation_cache_ttl_ms: settings.annotation_cache_ttl_ms,
            ci_url: settings.ci_url.clone(),
            ci_username: settings.ci_username.clone(),
            ci_secret_set: settings.ci_secret.as_deref().is_some_and(|s| !s.is_empty()),
            updated_at: settings.updated_at,
        }
    }
}

/// Partial settings update. Absent fields are left unchanged; an empty
/// string clears the field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    pub annotation_url: Option<String>,
    pub annotation_username: Option<String>,
    pub annotation_secret: Option<String>,
    pub annotation_cache_ttl_ms: Option<i64>,
    pub ci_url: Option<String>,
    pub ci_username: Option<String>,
    pub ci_secret: Option<String>,
}

fn apply_field(target: &mut Option<String>, patch: Option<String>) {
    if let Some(value) = patch {
        let trimmed = value.trim();
        *target = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
}

impl SettingsPatch {
    /// Apply the patch onto `settings`.
    pub fn apply_to(self, settings: &mut SettingsDbModel) {
        apply_field(&mut settings.annotation_url, self.annotation_url);
        apply_field(&mut settings.annotation_username, self.annotation_username);
        apply_field(&mut settings.annotation_secret, self.annotation_secret);
        if let Some(ttl) = self.annotation_cache_ttl_ms {
            settings.annotation_cache_ttl_ms = ttl;
        }
        apply_field(&mut settings.ci_url, self.ci_url);
        apply_field(&mut settings.ci_username, self.ci_username);
        apply_field(&mut settings.ci_secret, self.ci_secret);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> SettingsDbModel {
        SettingsDbModel {
            annotation_url: Some("http://cvat.local/".to_string()),
            annotation_username: Some("alice".to_string()),
            annotation_secret: Some("pw".to_string()),
            ci_url: Some("http://ci.local".to_string()),
            ci_username: Some("bot".to_string()),
            ci_secret: Some("token".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_credentials_trim_trailing_slash() {
        let creds = AnnotationCredentials::from_settings(&configured()).unwrap();
        assert_eq!(creds.url, "http://cvat.local");
        assert_eq!(creds.cache_ttl_ms, 5000);
    }

    #[test]
    fn test_blank_fields_mean_not_configured() {
        let mut settings = configured();
        settings.annotation_username = Some("   ".to_string());
        settings.ci_secret = None;
        assert!(AnnotationCredentials::from_settings(&settings).is_none());
        assert!(CiCredentials::from_settings(&settings).is_none());
    }

    #[test]
    fn test_view_hides_secrets() {
        let view = SettingsView::from(&configured());
        assert!(view.annotation_secret_set);
        assert!(view.ci_secret_set);
        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("\"pw\""));
        assert!(json.contains("annotationSecretSet"));
    }

    #[test]
    fn test_patch_leaves_absent_fields_and_clears_empty() {
        let mut settings = configured();
        let patch = SettingsPatch {
            ci_url: Some(String::new()),
            annotation_cache_ttl_ms: Some(250),
            ..Default::default()
        };
        patch.apply_to(&mut settings);

        assert_eq!(settings.ci_url, None);
        assert_eq!(settings.annotation_cache_ttl_ms, 250);
        assert_eq!(settings.annotation_username.as_deref(), Some("alice"));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = CiCredentials::from_settings(&configured()).unwrap();
        assert!(!format!("{creds:?}").contains("token"));
    }
}
