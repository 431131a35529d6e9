//! Annotation platform error types.

use thiserror::Error;

/// Errors raised while talking to the annotation platform.
///
/// Read paths never surface these to callers; they are logged and the
/// lookup degrades to "not found".
#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Annotation platform not configured")]
    NotConfigured,

    /// Login call returned a non-success status.
    #[error("Authentication failed: {status}")]
    AuthenticationFailed { status: u16 },

    /// Non-success response on a read call.
    #[error("Annotation platform unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failed_includes_status() {
        let err = AnnotationError::AuthenticationFailed { status: 401 };
        assert_eq!(err.to_string(), "Authentication failed: 401");
    }
}
