//! Yahoo Finance chart API response models.
//!
//! Only the fields the dashboard uses are mapped. Everything is optional
//! because the endpoint omits fields freely (delisted symbols, empty
//! sessions, `result: null` on errors).

use serde::Deserialize;

use crate::models::ChartMeta;

/// Top-level `/v8/finance/chart` response
#[derive(Debug, Deserialize)]
pub struct YahooChartResponse {
    #[serde(default)]
    pub chart: Option<YahooChart>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChart {
    #[serde(default)]
    pub result: Option<Vec<YahooChartResult>>,
}

#[derive(Debug, Deserialize)]
pub struct YahooChartResult {
    pub meta: Option<YahooChartMeta>,
    /// Unix seconds, aligned with `indicators.quote[0].close`
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<YahooIndicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooChartMeta {
    pub symbol: Option<String>,
    pub currency: Option<String>,
    pub exchange_name: Option<String>,
    pub market_state: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct YahooIndicators {
    #[serde(default)]
    pub quote: Vec<YahooIndicatorQuote>,
}

#[derive(Debug, Deserialize)]
pub struct YahooIndicatorQuote {
    /// Close prices; null where the provider has no trade for the interval
    #[serde(default)]
    pub close: Option<Vec<Option<f64>>>,
}

impl From<YahooChartMeta> for ChartMeta {
    fn from(meta: YahooChartMeta) -> Self {
        Self {
            symbol: meta.symbol,
            regular_market_price: meta.regular_market_price,
            previous_close: meta.previous_close,
            currency: meta.currency,
            market_state: meta.market_state,
            exchange_name: meta.exchange_name,
        }
    }
}
