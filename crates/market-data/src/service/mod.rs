//! Request orchestration for the dashboard endpoints.
//!
//! Each service composes a provider with its own cache keyspace:
//!
//! | Service | Cache | Coalesced | On rate limit |
//! |---------|-------|-----------|---------------|
//! | [`QuoteService`] | per symbol, 5 min | yes | serve last known quote |
//! | [`ChartService`] | per symbol + range, 30 s | yes | error |
//! | [`SearchService`] | per query, 5 min | no | variant skipped |
//! | [`NewsService`] | none | no | error |

mod chart;
mod news;
mod quote;
mod search;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Duration;

pub use chart::ChartService;
pub use news::{news_query, NewsService};
pub use quote::QuoteService;
pub use search::SearchService;

use crate::cache::{CacheStore, InFlightRegistry};
use crate::errors::MarketDataError;
use crate::models::{ChartRange, ChartSeries, NewsDigest, Quote, SearchResponse};
use crate::provider::{NewsProvider, QuoteProvider};

/// Cache lifetimes and pacing for the services.
#[derive(Clone, Debug, PartialEq)]
pub struct MarketDataSettings {
    pub quote_ttl: Duration,
    pub chart_ttl: Duration,
    pub search_ttl: Duration,
    /// Pause before each upstream quote fetch
    pub quote_fetch_delay: Duration,
}

impl Default for MarketDataSettings {
    fn default() -> Self {
        Self {
            quote_ttl: Duration::from_secs(5 * 60),
            chart_ttl: Duration::from_secs(30),
            search_ttl: Duration::from_secs(5 * 60),
            quote_fetch_delay: Duration::from_secs(1),
        }
    }
}

/// Entry point used by the HTTP layer.
///
/// Owns one cache store per keyspace for the lifetime of the process.
pub struct MarketDataService {
    quotes: QuoteService,
    charts: ChartService,
    search: SearchService,
    news: NewsService,
}

impl MarketDataService {
    pub fn new(
        quote_provider: Arc<dyn QuoteProvider>,
        news_provider: Arc<dyn NewsProvider>,
        settings: &MarketDataSettings,
    ) -> Self {
        Self {
            quotes: QuoteService::new(
                Arc::clone(&quote_provider),
                CacheStore::new(),
                InFlightRegistry::new(),
                settings.quote_ttl,
                settings.quote_fetch_delay,
            ),
            charts: ChartService::new(
                Arc::clone(&quote_provider),
                CacheStore::new(),
                InFlightRegistry::new(),
                settings.chart_ttl,
            ),
            search: SearchService::new(quote_provider, CacheStore::new(), settings.search_ttl),
            news: NewsService::new(news_provider),
        }
    }

    pub async fn quote(&self, ticker: &str) -> Result<Quote, MarketDataError> {
        self.quotes.get_quote(ticker).await
    }

    pub async fn chart(
        &self,
        ticker: &str,
        range: ChartRange,
    ) -> Result<ChartSeries, MarketDataError> {
        self.charts.get_chart(ticker, range).await
    }

    pub async fn search(&self, query: &str) -> Result<SearchResponse, MarketDataError> {
        self.search.search(query).await
    }

    pub async fn news(&self, ticker: &str) -> Result<NewsDigest, MarketDataError> {
        self.news.get_news(ticker).await
    }
}
