//! CI server error types.

use thiserror::Error;

/// Maximum number of response body characters kept in a rejection error.
pub const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum CiError {
    #[error("CI server not configured. Go to Settings to configure CI credentials.")]
    NotConfigured,

    /// Build request answered with something other than `201 Created`.
    #[error("CI server returned {status}: {body}")]
    TriggerRejected { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl CiError {
    /// Build a rejection error, keeping at most [`MAX_ERROR_BODY_CHARS`] of the body.
    pub fn rejected(status: u16, body: &str) -> Self {
        Self::TriggerRejected {
            status,
            body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_body_is_truncated() {
        let body = "x".repeat(500);
        let err = CiError::rejected(500, &body);
        let msg = err.to_string();
        assert!(msg.starts_with("CI server returned 500: "));
        assert_eq!(msg.len(), "CI server returned 500: ".len() + MAX_ERROR_BODY_CHARS);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let body = "é".repeat(300);
        let CiError::TriggerRejected { body, .. } = CiError::rejected(403, &body) else {
            panic!("expected rejection");
        };
        assert_eq!(body.chars().count(), MAX_ERROR_BODY_CHARS);
    }
}
