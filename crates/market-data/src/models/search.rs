//! Search result models for multi-exchange lookup.

use serde::Serialize;

use super::Quote;

/// A quote found on one exchange variant of the searched query.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    #[serde(flatten)]
    pub quote: Quote,

    /// Exchange code (e.g., "NSE", "BSE", "INTL")
    pub exchange: String,

    /// Display name of the exchange
    pub exchange_full_name: String,

    /// Query the variant was derived from
    pub original_query: String,
}

/// Whole search response, cached as a unit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchResponse {
    /// Base query with any exchange suffix removed
    pub query: String,

    pub results: Vec<SearchResult>,

    /// Epoch milliseconds when the response was assembled
    pub timestamp: i64,
}
