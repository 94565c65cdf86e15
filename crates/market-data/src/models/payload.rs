//! Provider payloads as classified by the upstream clients.
//!
//! Every field the provider may omit stays optional here; defaults are
//! applied in one place by [`crate::normalize`].

/// The `meta` block of a chart response.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartMeta {
    pub symbol: Option<String>,
    pub regular_market_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub currency: Option<String>,
    pub market_state: Option<String>,
    pub exchange_name: Option<String>,
}

/// First chart result: meta plus index-aligned timestamps and closes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartPayload {
    pub meta: ChartMeta,
    /// Unix seconds.
    pub timestamps: Vec<i64>,
    pub closes: Vec<Option<f64>>,
}

/// Headline search result from the news provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewsPayload {
    pub titles: Vec<Option<String>>,
    pub total_results: Option<u64>,
}
