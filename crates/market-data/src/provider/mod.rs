//! Upstream provider clients.
//!
//! This module contains:
//! - The `QuoteProvider` and `NewsProvider` traits the services depend on
//! - Response classification shared by the HTTP clients
//! - A per-provider token bucket rate limiter
//! - Concrete clients for Yahoo Finance charts and NewsAPI
//!
//! Providers return payloads with optional fields; shaping and defaulting
//! happens in [`crate::normalize`].

mod classify;
mod rate_limiter;
mod traits;

pub mod news_api;
pub mod yahoo;

use std::time::Duration;

pub use classify::{classify_response, mentions_rate_limit};
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use traits::{NewsProvider, QuoteProvider};

/// Default timeout for a single upstream request.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for an HTTP provider.
#[derive(Clone, Debug)]
pub struct ProviderConfig {
    /// Scheme and host, without a trailing path (e.g., "https://newsapi.org")
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Local request budget for this provider
    pub rate_limit: RateLimitConfig,
}

impl ProviderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            rate_limit: RateLimitConfig::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
