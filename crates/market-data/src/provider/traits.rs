//! Provider trait definitions.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{ChartPayload, ChartWindow, NewsPayload};

/// Source of chart data, used for quotes, chart series and search.
///
/// Implementations classify the raw HTTP response themselves and return
/// either the first chart result or a typed failure:
///
/// - `RateLimited` for HTTP 429 or rate-limit text in a non-JSON body
/// - `MalformedResponse` for any other non-JSON or unparsable body
/// - `SymbolNotFound` when there is no first result
/// - `InvalidData` when the first result has no `meta`
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Constant identifier like "YAHOO", used for logging and rate limiting.
    fn id(&self) -> &'static str;

    /// Fetch the chart for `symbol`.
    ///
    /// Without a window only the current metadata matters (quote lookups);
    /// with one, the provider returns the series for that range/interval.
    async fn fetch_chart(
        &self,
        symbol: &str,
        window: Option<ChartWindow>,
    ) -> Result<ChartPayload, MarketDataError>;
}

/// Source of news headlines.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    fn id(&self) -> &'static str;

    /// Search recent English-language articles matching `query`.
    async fn fetch_articles(&self, query: &str) -> Result<NewsPayload, MarketDataError>;
}
