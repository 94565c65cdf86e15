use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::{CacheKey, CacheStore, Flight, InFlightRegistry};
use crate::errors::MarketDataError;

/// What to do when the upstream rate limits a fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateLimitPolicy {
    /// Surface the error to every waiter.
    Propagate,
    /// Serve and re-stamp any existing entry, fresh or stale.
    ServeStale,
}

/// Fetch lifecycle for one keyspace: fresh hit, else join the running fetch,
/// else own a new one.
///
/// The owner's fetch runs on a spawned task, so a caller that goes away
/// does not cancel it and the result still lands in the cache.
pub struct RequestCache<V> {
    store: CacheStore<V>,
    flights: InFlightRegistry<V>,
    ttl: Duration,
    on_rate_limit: RateLimitPolicy,
}

impl<V> RequestCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(
        store: CacheStore<V>,
        flights: InFlightRegistry<V>,
        ttl: Duration,
        on_rate_limit: RateLimitPolicy,
    ) -> Self {
        Self {
            store,
            flights,
            ttl,
            on_rate_limit,
        }
    }

    pub fn store(&self) -> &CacheStore<V> {
        &self.store
    }

    pub fn flights(&self) -> &InFlightRegistry<V> {
        &self.flights
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get_or_fetch<F, Fut>(&self, key: CacheKey, fetch: F) -> Result<V, MarketDataError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<V, MarketDataError>> + Send + 'static,
    {
        if let Some(value) = self.store.get_fresh(&key, self.ttl) {
            debug!("Cache hit for {}", key);
            return Ok(value);
        }

        let handle = match self.flights.acquire_or_join(&key) {
            Flight::Joiner(handle) => handle,
            Flight::Owner(guard) => {
                let handle = guard.handle();
                let store = self.store.clone();
                let ttl = self.ttl;
                let on_rate_limit = self.on_rate_limit;
                tokio::spawn(async move {
                    let result = run_fetch(&store, guard.key(), ttl, on_rate_limit, fetch).await;
                    guard.complete(result);
                });
                handle
            }
        };

        handle.wait().await
    }
}

async fn run_fetch<V, F, Fut>(
    store: &CacheStore<V>,
    key: &CacheKey,
    ttl: Duration,
    on_rate_limit: RateLimitPolicy,
    fetch: F,
) -> Result<V, MarketDataError>
where
    V: Clone,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, MarketDataError>>,
{
    // A previous owner may have settled between our lookup and registration.
    if let Some(value) = store.get_fresh(key, ttl) {
        return Ok(value);
    }

    match fetch().await {
        Ok(value) => {
            store.set(key.clone(), value.clone());
            Ok(value)
        }
        Err(err) if err.is_rate_limited() && on_rate_limit == RateLimitPolicy::ServeStale => {
            match store.get(key, ttl) {
                Some(cached) => {
                    warn!(
                        "Rate limited fetching {}, serving cached value ({}s old)",
                        key,
                        cached.age.as_secs()
                    );
                    store.set(key.clone(), cached.value.clone());
                    Ok(cached.value)
                }
                None => Err(err),
            }
        }
        Err(err) => {
            debug!("Fetch for {} failed: {}", key, err);
            Err(err)
        }
    }
}
