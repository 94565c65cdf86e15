use std::sync::Arc;

use tracing::info;

use crate::errors::MarketDataError;
use crate::exchanges::strip_exchange_suffix;
use crate::models::NewsDigest;
use crate::normalize;
use crate::provider::NewsProvider;

/// Recent headlines for a ticker with keyword sentiment. Not cached.
pub struct NewsService {
    provider: Arc<dyn NewsProvider>,
}

impl NewsService {
    pub fn new(provider: Arc<dyn NewsProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_news(&self, ticker: &str) -> Result<NewsDigest, MarketDataError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(MarketDataError::InvalidRequest(
                "Ticker symbol is required".to_string(),
            ));
        }

        let query = news_query(ticker);
        info!("Fetching news for '{}' from {}", query, self.provider.id());
        let payload = self.provider.fetch_articles(&query).await?;
        Ok(normalize::news_digest(&payload))
    }
}

/// Headline search text for a ticker, without any exchange suffix.
pub fn news_query(ticker: &str) -> String {
    format!("{} stock", strip_exchange_suffix(ticker.trim()))
}
