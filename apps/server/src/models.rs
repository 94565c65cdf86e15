use serde::{Deserialize, Serialize};
use stockpulse_market_data::{ChartSeries, NewsDigest, Quote, SearchResponse, SearchResult};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: String,
    pub market_state: String,
    pub exchange_name: String,
}

impl From<Quote> for QuoteResponse {
    fn from(q: Quote) -> Self {
        Self {
            symbol: q.symbol,
            price: q.price,
            change: q.change,
            change_percent: q.change_percent,
            currency: q.currency,
            market_state: q.market_state,
            exchange_name: q.exchange_name,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct ChartPointResponse {
    /// ISO-8601 UTC
    pub time: String,
    pub price: f64,
    /// Epoch milliseconds
    pub timestamp: i64,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartResponse {
    pub success: bool,
    pub chart_data: Vec<ChartPointResponse>,
    pub symbol: String,
    pub range: String,
    pub data_points: usize,
}

impl From<ChartSeries> for ChartResponse {
    fn from(series: ChartSeries) -> Self {
        let chart_data: Vec<ChartPointResponse> = series
            .points
            .into_iter()
            .map(|p| ChartPointResponse {
                time: p.time,
                price: p.price,
                timestamp: p.timestamp_millis,
            })
            .collect();
        Self {
            success: true,
            data_points: chart_data.len(),
            chart_data,
            symbol: series.symbol,
            range: series.range,
        }
    }
}

#[derive(Deserialize)]
pub struct ChartQuery {
    pub range: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultResponse {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub currency: String,
    pub market_state: String,
    pub exchange_name: String,
    /// "NSE", "BSE" or "INTL"
    pub exchange: String,
    pub exchange_full_name: String,
    pub original_query: String,
}

impl From<SearchResult> for SearchResultResponse {
    fn from(r: SearchResult) -> Self {
        Self {
            symbol: r.quote.symbol,
            price: r.quote.price,
            change: r.quote.change,
            change_percent: r.quote.change_percent,
            currency: r.quote.currency,
            market_state: r.quote.market_state,
            exchange_name: r.quote.exchange_name,
            exchange: r.exchange,
            exchange_full_name: r.exchange_full_name,
            original_query: r.original_query,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct SearchResponseBody {
    pub query: String,
    pub results: Vec<SearchResultResponse>,
    /// Epoch milliseconds
    pub timestamp: i64,
}

impl From<SearchResponse> for SearchResponseBody {
    fn from(r: SearchResponse) -> Self {
        Self {
            query: r.query,
            results: r.results.into_iter().map(Into::into).collect(),
            timestamp: r.timestamp,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub headlines: Vec<String>,
    /// "positive", "neutral" or "negative"
    pub sentiment: String,
    pub sentiment_score: f64,
    pub total_articles: u64,
}

impl From<NewsDigest> for NewsResponse {
    fn from(d: NewsDigest) -> Self {
        Self {
            headlines: d.headlines,
            sentiment: d.sentiment.as_str().to_string(),
            sentiment_score: d.sentiment_score,
            total_articles: d.total_articles,
        }
    }
}
