use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::debug;

use crate::cache::{normalize_identifier, CacheKey, CacheStore};
use crate::errors::MarketDataError;
use crate::exchanges::{strip_exchange_suffix, EXCHANGE_VARIANTS, INTERNATIONAL_CODE};
use crate::models::{Quote, SearchResponse, SearchResult};
use crate::normalize;
use crate::provider::QuoteProvider;

/// Looks a query up on every known exchange variant.
///
/// Variants are tried one after another; a variant that fails is skipped.
/// Whole responses are cached by query, with no request coalescing.
pub struct SearchService {
    provider: Arc<dyn QuoteProvider>,
    store: CacheStore<SearchResponse>,
    ttl: Duration,
}

impl SearchService {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        store: CacheStore<SearchResponse>,
        ttl: Duration,
    ) -> Self {
        Self {
            provider,
            store,
            ttl,
        }
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, MarketDataError> {
        let query = normalize_identifier(query);
        if query.is_empty() {
            return Err(MarketDataError::InvalidRequest(
                "Query parameter is required".to_string(),
            ));
        }

        let key = CacheKey::search(&query);
        if let Some(cached) = self.store.get_fresh(&key, self.ttl) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }

        let base = strip_exchange_suffix(&query).to_string();
        let mut results = Vec::new();

        for variant in EXCHANGE_VARIANTS {
            let ticker = format!("{}{}", base, variant.suffix);
            match self.lookup(&ticker).await {
                Ok(quote) => results.push(SearchResult {
                    quote,
                    exchange: variant.code.to_string(),
                    exchange_full_name: variant.full_name.to_string(),
                    original_query: base.clone(),
                }),
                Err(err) => debug!("Search skipped {}: {}", ticker, err),
            }
        }

        // A dotted query already names its exchange.
        if !query.contains('.') {
            match self.lookup(&query).await {
                Ok(quote) => results.push(SearchResult {
                    exchange: INTERNATIONAL_CODE.to_string(),
                    exchange_full_name: quote.exchange_name.clone(),
                    original_query: query.clone(),
                    quote,
                }),
                Err(err) => debug!("Search skipped {}: {}", query, err),
            }
        }

        let response = SearchResponse {
            query: base,
            results,
            timestamp: Utc::now().timestamp_millis(),
        };
        self.store.set(key, response.clone());
        Ok(response)
    }

    async fn lookup(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        let payload = self.provider.fetch_chart(ticker, None).await?;
        normalize::quote_from_meta(ticker, &payload.meta)
    }
}
