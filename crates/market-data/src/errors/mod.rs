//! Error types for the market data crate.
//!
//! [`MarketDataError`] is `Clone` so a single upstream failure can be handed
//! to every caller that joined the same in-flight request.

use std::time::Duration;

use thiserror::Error;

/// Suggested client back-off after an upstream rate limit.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Errors that can occur during market data operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// The caller supplied an empty or unusable ticker/query.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider has no data for the requested symbol.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request, either with HTTP 429 or with a
    /// non-JSON body carrying rate-limit phrasing.
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
        /// How long the client should wait before retrying
        retry_after: Duration,
    },

    /// The provider answered with a body that is not the JSON we expect.
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that sent the body
        provider: String,
        /// What was wrong with it
        message: String,
    },

    /// The payload parsed but is missing fields required to build a result.
    #[error("Invalid data: {message}")]
    InvalidData {
        /// Description of the missing or unusable field
        message: String,
    },

    /// The provider returned a non-success status other than 404/429.
    #[error("Upstream error: {provider} returned HTTP {status}")]
    UpstreamStatus {
        /// The provider that returned the status
        provider: String,
        /// HTTP status code
        status: u16,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A transport-level failure while talking to a provider.
    #[error("Network error: {provider} - {message}")]
    Network {
        /// The provider being called
        provider: String,
        /// The underlying transport error
        message: String,
    },

    /// A provider is missing required configuration (e.g. an API key).
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    /// The request that owned an in-flight fetch went away without
    /// publishing a result.
    #[error("In-flight request abandoned: {0}")]
    Abandoned(String),
}

impl MarketDataError {
    /// Builds a rate-limit error with the default retry-after hint.
    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
            retry_after: DEFAULT_RETRY_AFTER,
        }
    }

    /// Returns true for upstream rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Retry-after hint, only present for rate limiting.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// Maps a reqwest transport error into a provider-tagged error.
    pub(crate) fn from_transport(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                provider: provider.to_string(),
            }
        } else {
            Self::Network {
                provider: provider.to_string(),
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_carries_default_retry_after() {
        let error = MarketDataError::rate_limited("YAHOO");
        assert!(error.is_rate_limited());
        assert_eq!(error.retry_after(), Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_other_errors_have_no_retry_after() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert!(!error.is_rate_limited());
        assert_eq!(error.retry_after(), None);
    }

    #[test]
    fn test_error_display() {
        let error = MarketDataError::SymbolNotFound("INVALID".to_string());
        assert_eq!(format!("{}", error), "Symbol not found: INVALID");

        let error = MarketDataError::rate_limited("YAHOO");
        assert_eq!(format!("{}", error), "Rate limited: YAHOO");

        let error = MarketDataError::UpstreamStatus {
            provider: "NEWS_API".to_string(),
            status: 503,
        };
        assert_eq!(
            format!("{}", error),
            "Upstream error: NEWS_API returned HTTP 503"
        );
    }

    #[test]
    fn test_errors_clone_equal() {
        let error = MarketDataError::MalformedResponse {
            provider: "YAHOO".to_string(),
            message: "expected JSON".to_string(),
        };
        assert_eq!(error.clone(), error);
    }
}
