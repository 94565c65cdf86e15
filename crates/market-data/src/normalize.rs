//! Response normalization.
//!
//! Provider payloads leave most fields optional. This module is the single
//! place where defaults are applied and derived values are computed.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::errors::MarketDataError;
use crate::models::{
    ChartMeta, ChartPayload, ChartPoint, ChartRange, ChartSeries, NewsDigest, NewsPayload, Quote,
};
use crate::sentiment::score_headlines;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_MARKET_STATE: &str = "UNKNOWN";
pub const DEFAULT_EXCHANGE_NAME: &str = "Unknown Exchange";

/// Builds a quote from chart metadata.
///
/// The price falls back to the previous close when the market price is
/// absent or zero. A missing or zero previous close is an error rather than
/// an infinite percentage.
pub fn quote_from_meta(symbol: &str, meta: &ChartMeta) -> Result<Quote, MarketDataError> {
    let previous_close = meta
        .previous_close
        .filter(|close| close.is_finite() && *close != 0.0)
        .ok_or_else(|| MarketDataError::InvalidData {
            message: format!("{}: previous close is missing or zero", symbol),
        })?;

    let price = meta
        .regular_market_price
        .filter(|price| price.is_finite() && *price != 0.0)
        .unwrap_or(previous_close);

    let change = price - previous_close;
    let change_percent = change / previous_close * 100.0;

    Ok(Quote {
        symbol: symbol.to_string(),
        price,
        change,
        change_percent,
        currency: non_empty_or(meta.currency.as_deref(), DEFAULT_CURRENCY),
        market_state: non_empty_or(meta.market_state.as_deref(), DEFAULT_MARKET_STATE),
        exchange_name: non_empty_or(meta.exchange_name.as_deref(), DEFAULT_EXCHANGE_NAME),
    })
}

/// Builds a chart series, dropping points with absent or non-positive price.
///
/// Timestamps and closes are paired by index; provider order is kept.
pub fn chart_series(symbol: &str, range: ChartRange, payload: &ChartPayload) -> ChartSeries {
    let points = payload
        .timestamps
        .iter()
        .zip(payload.closes.iter())
        .filter_map(|(&ts, close)| match close {
            Some(price) if *price > 0.0 => chart_point(ts, *price),
            _ => None,
        })
        .collect();

    ChartSeries {
        symbol: symbol.to_string(),
        range: range.label().to_string(),
        points,
    }
}

fn chart_point(ts_secs: i64, price: f64) -> Option<ChartPoint> {
    let timestamp_millis = ts_secs.checked_mul(1000)?;
    let time = DateTime::<Utc>::from_timestamp_millis(timestamp_millis)?
        .to_rfc3339_opts(SecondsFormat::Millis, true);
    Some(ChartPoint {
        time,
        price,
        timestamp_millis,
    })
}

/// Collects headlines and scores their sentiment.
pub fn news_digest(payload: &NewsPayload) -> NewsDigest {
    let headlines: Vec<String> = payload
        .titles
        .iter()
        .flatten()
        .filter(|title| !title.trim().is_empty())
        .cloned()
        .collect();
    let score = score_headlines(headlines.as_slice());
    let total_articles = payload.total_results.unwrap_or(headlines.len() as u64);

    NewsDigest {
        headlines,
        sentiment: score.sentiment,
        sentiment_score: score.magnitude,
        total_articles,
    }
}

fn non_empty_or(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}
