//! Provider error types.
//!
//! Failures when talking to a question-generation API. The CLI retry loop
//! downcasts to these to classify errors instead of string matching.

use thiserror::Error;

/// Errors that can occur when interacting with a question generator API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence_classification() {
        assert!(ProviderError::AuthenticationFailed("bad key".into()).is_permanent());
        assert!(ProviderError::ModelNotFound("no-such-model".into()).is_permanent());
        assert!(!ProviderError::RateLimited { retry_after_ms: 100 }.is_permanent());
        assert!(!ProviderError::Timeout(60).is_permanent());
    }

    #[test]
    fn retry_after_hint() {
        assert_eq!(
            ProviderError::RateLimited { retry_after_ms: 5000 }.retry_after_ms(),
            Some(5000)
        );
        assert_eq!(ProviderError::Timeout(30).retry_after_ms(), None);
    }
}
