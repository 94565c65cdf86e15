use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{
    normalize_identifier, CacheKey, CacheStore, InFlightRegistry, RateLimitPolicy, RequestCache,
};
use crate::errors::MarketDataError;
use crate::models::Quote;
use crate::normalize;
use crate::provider::QuoteProvider;

/// Current quotes, cached per symbol and coalesced.
///
/// When the provider rate limits a refresh, the last known quote is served
/// instead, however old it is.
pub struct QuoteService {
    provider: Arc<dyn QuoteProvider>,
    cache: RequestCache<Quote>,
    fetch_delay: Duration,
}

impl QuoteService {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        store: CacheStore<Quote>,
        flights: InFlightRegistry<Quote>,
        ttl: Duration,
        fetch_delay: Duration,
    ) -> Self {
        Self {
            provider,
            cache: RequestCache::new(store, flights, ttl, RateLimitPolicy::ServeStale),
            fetch_delay,
        }
    }

    pub async fn get_quote(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        let symbol = normalize_identifier(ticker);
        if symbol.is_empty() {
            return Err(MarketDataError::InvalidRequest(
                "Ticker symbol is required".to_string(),
            ));
        }

        let key = CacheKey::quote(&symbol);
        let provider = Arc::clone(&self.provider);
        let delay = self.fetch_delay;

        self.cache
            .get_or_fetch(key, move || async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                info!("Fetching quote for {} from {}", symbol, provider.id());
                let payload = provider.fetch_chart(&symbol, None).await?;
                normalize::quote_from_meta(&symbol, &payload.meta)
            })
            .await
    }
}
