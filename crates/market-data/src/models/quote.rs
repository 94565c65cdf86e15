//! Normalized quote model.

use serde::Serialize;

/// Current quote for a symbol, derived from the provider's chart metadata.
///
/// `change` and `change_percent` are always computed against the previous
/// close, never taken from the provider.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Symbol/ticker as requested, upper-cased (e.g., "AAPL", "INFY.NS")
    pub symbol: String,

    /// Last traded price
    pub price: f64,

    /// `price - previous_close`
    pub change: f64,

    /// `change / previous_close * 100`
    pub change_percent: f64,

    /// ISO 4217 currency code
    pub currency: String,

    /// Market session (e.g., "REGULAR", "CLOSED")
    pub market_state: String,

    /// Provider's exchange name (e.g., "NMS", "NSI")
    pub exchange_name: String,
}
