use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{
    normalize_identifier, CacheKey, CacheStore, InFlightRegistry, RateLimitPolicy, RequestCache,
};
use crate::errors::MarketDataError;
use crate::models::{ChartRange, ChartSeries};
use crate::normalize;
use crate::provider::QuoteProvider;

/// Chart series, cached per symbol and range.
pub struct ChartService {
    provider: Arc<dyn QuoteProvider>,
    cache: RequestCache<ChartSeries>,
}

impl ChartService {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        store: CacheStore<ChartSeries>,
        flights: InFlightRegistry<ChartSeries>,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            cache: RequestCache::new(store, flights, ttl, RateLimitPolicy::Propagate),
        }
    }

    pub async fn get_chart(
        &self,
        ticker: &str,
        range: ChartRange,
    ) -> Result<ChartSeries, MarketDataError> {
        let symbol = normalize_identifier(ticker);
        if symbol.is_empty() {
            return Err(MarketDataError::InvalidRequest(
                "Ticker symbol is required".to_string(),
            ));
        }

        let key = CacheKey::chart(&symbol, range);
        let provider = Arc::clone(&self.provider);

        self.cache
            .get_or_fetch(key, move || async move {
                info!("Fetching {} chart for {} from {}", range, symbol, provider.id());
                let payload = provider.fetch_chart(&symbol, Some(range.window())).await?;
                Ok(normalize::chart_series(&symbol, range, &payload))
            })
            .await
    }
}
