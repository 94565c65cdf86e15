//! Token bucket rate limiter for upstream providers.
//!
//! Keeps our own request rate under each provider's published limit so the
//! caches are not the only line of defence against 429s. Buckets are keyed
//! by provider id and created on first use.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;
const DEFAULT_BURST_CAPACITY: f64 = 10.0;

/// Rate limit for one provider.
#[derive(Clone, Debug, PartialEq)]
pub struct RateLimitConfig {
    /// Sustained requests per minute.
    pub requests_per_minute: u32,
    /// Requests allowed back to back before throttling kicks in.
    pub burst_capacity: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            burst_capacity: DEFAULT_BURST_CAPACITY,
        }
    }
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    /// Tokens per second.
    rate: f64,
    capacity: f64,
}

impl TokenBucket {
    fn new(config: &RateLimitConfig) -> Self {
        let capacity = config.burst_capacity.max(1.0);
        Self {
            tokens: capacity,
            last_refill: Instant::now(),
            rate: f64::from(config.requests_per_minute.max(1)) / 60.0,
            capacity,
        }
    }

    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.capacity);
        self.last_refill = now;
    }

    /// Takes a token, or returns how long until one is available.
    fn take(&mut self) -> Result<(), Duration> {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            Ok(())
        } else {
            Err(Duration::from_secs_f64((1.0 - self.tokens) / self.rate))
        }
    }
}

#[derive(Default)]
struct LimiterState {
    configs: HashMap<String, RateLimitConfig>,
    buckets: HashMap<String, TokenBucket>,
}

impl LimiterState {
    fn bucket(&mut self, provider: &str) -> &mut TokenBucket {
        let config = self.configs.get(provider).cloned().unwrap_or_default();
        self.buckets
            .entry(provider.to_string())
            .or_insert_with(|| TokenBucket::new(&config))
    }
}

/// Per-provider token buckets behind a single mutex.
#[derive(Default)]
pub struct RateLimiter {
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    // Worst case after a poisoned lock is slightly off throttling.
    fn lock(&self) -> MutexGuard<'_, LimiterState> {
        self.state.lock().unwrap_or_else(|poisoned| {
            warn!("Rate limiter mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Sets the limit for a provider, resetting its bucket.
    pub fn configure(&self, provider: &str, config: RateLimitConfig) {
        let mut state = self.lock();
        state.configs.insert(provider.to_string(), config);
        state.buckets.remove(provider);
    }

    /// Waits until a token is available for `provider`.
    pub async fn acquire(&self, provider: &str) {
        loop {
            let wait = match self.lock().bucket(provider).take() {
                Ok(()) => {
                    debug!("Rate limiter: acquired token for '{}'", provider);
                    return;
                }
                Err(wait) => wait,
            };
            debug!(
                "Rate limiter: waiting {:?} for provider '{}'",
                wait, provider
            );
            tokio::time::sleep(wait).await;
        }
    }

    /// Takes a token without waiting.
    pub fn try_acquire(&self, provider: &str) -> bool {
        self.lock().bucket(provider).take().is_ok()
    }
}
