//! Annotation platform session management.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{AnnotationCredentials, CredentialsProvider};

use super::client::AnnotationClient;
use super::error::AnnotationError;

/// Fixed session lifetime; the login response carries no expiry.
pub const DEFAULT_SESSION_LIFETIME: Duration = Duration::from_secs(3600);

/// The credential fields a session is bound to.
///
/// Only the URL and username are compared. A change of secret alone keeps
/// the current session until it expires. The lookup caches are keyed by
/// server URL as well, so results from a previous server are never served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBinding {
    pub url: String,
    pub username: String,
}

impl SessionBinding {
    pub fn of(credentials: &AnnotationCredentials) -> Self {
        Self {
            url: credentials.url.clone(),
            username: credentials.username.clone(),
        }
    }
}

struct AnnotationSession {
    token: String,
    expires_at: Instant,
    binding: SessionBinding,
}

impl AnnotationSession {
    fn is_valid_for(&self, binding: &SessionBinding) -> bool {
        Instant::now() < self.expires_at && self.binding == *binding
    }
}

/// Credentials plus the token of the session they are authenticated with.
#[derive(Debug, Clone)]
pub struct AuthenticatedSession {
    pub credentials: AnnotationCredentials,
    pub token: String,
}

/// Owns the annotation session token and re-authenticates when needed.
pub struct SessionManager {
    provider: Arc<dyn CredentialsProvider>,
    client: AnnotationClient,
    session: Mutex<Option<AnnotationSession>>,
    lifetime: Duration,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn CredentialsProvider>, client: AnnotationClient) -> Self {
        Self {
            provider,
            client,
            session: Mutex::new(None),
            lifetime: DEFAULT_SESSION_LIFETIME,
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Return the current credentials with a valid session, logging in first
    /// if the session is missing, expired or bound to other credentials.
    ///
    /// Logins are serialized: concurrent callers wait on the session lock and
    /// reuse the token installed by the first one.
    pub async fn ensure_authenticated(&self) -> Result<AuthenticatedSession, AnnotationError> {
        let credentials = self
            .provider
            .annotation_credentials()
            .await
            .ok_or(AnnotationError::NotConfigured)?;
        let binding = SessionBinding::of(&credentials);

        let mut session = self.session.lock().await;
        if let Some(current) = session.as_ref()
            && current.is_valid_for(&binding)
        {
            return Ok(AuthenticatedSession {
                token: current.token.clone(),
                credentials,
            });
        }

        if session.is_some() {
            debug!(url = %binding.url, "Annotation session expired or rebound, logging in again");
        }
        *session = None;

        let token = match self.client.login(&credentials).await {
            Ok(token) => token,
            Err(e) => {
                warn!(url = %binding.url, username = %binding.username, error = %e, "Annotation login failed");
                return Err(e);
            }
        };

        info!(url = %binding.url, username = %binding.username, "Authenticated with annotation platform");
        *session = Some(AnnotationSession {
            token: token.clone(),
            expires_at: Instant::now() + self.lifetime,
            binding,
        });

        Ok(AuthenticatedSession { credentials, token })
    }

    /// Whether a session is currently installed, valid or not.
    pub async fn has_session(&self) -> bool {
        self.session.lock().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binding_ignores_secret() {
        let a = AnnotationCredentials {
            url: "http://cvat".to_string(),
            username: "alice".to_string(),
            secret: "one".to_string(),
            cache_ttl_ms: 5000,
        };
        let b = AnnotationCredentials {
            secret: "two".to_string(),
            ..a.clone()
        };
        assert_eq!(SessionBinding::of(&a), SessionBinding::of(&b));
    }

    #[tokio::test]
    async fn test_session_validity() {
        let binding = SessionBinding {
            url: "http://cvat".to_string(),
            username: "alice".to_string(),
        };
        let session = AnnotationSession {
            token: "k".to_string(),
            expires_at: Instant::now() + Duration::from_secs(60),
            binding: binding.clone(),
        };
        assert!(session.is_valid_for(&binding));

        let other = SessionBinding {
            username: "bob".to_string(),
            ..binding.clone()
        };
        assert!(!session.is_valid_for(&other));

        let expired = AnnotationSession {
            expires_at: Instant::now() - Duration::from_millis(1),
            ..session
        };
        assert!(!expired.is_valid_for(&binding));
    }
}
