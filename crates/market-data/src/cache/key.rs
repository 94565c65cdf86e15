use std::fmt;

use crate::models::ChartRange;

/// Cache and in-flight key.
///
/// Identifiers are trimmed and upper-cased so case and whitespace variants
/// share an entry. The operation prefix keeps keyspaces apart.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn quote(symbol: &str) -> Self {
        Self(format!("quote:{}", normalize_identifier(symbol)))
    }

    /// The range label never contains `:`, so the symbol is recoverable.
    pub fn chart(symbol: &str, range: ChartRange) -> Self {
        Self(format!(
            "chart:{}:{}",
            normalize_identifier(symbol),
            range.label()
        ))
    }

    pub fn search(query: &str) -> Self {
        Self(format!("search:{}", normalize_identifier(query)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trims and upper-cases a ticker or query.
pub fn normalize_identifier(raw: &str) -> String {
    raw.trim().to_uppercase()
}
