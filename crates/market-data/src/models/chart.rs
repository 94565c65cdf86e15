//! Chart ranges and normalized price series.

use std::fmt;

use serde::Serialize;

/// Provider query parameters for one chart range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartWindow {
    /// Value for the provider's `range` parameter (e.g., "1d", "max")
    pub range: &'static str,
    /// Value for the provider's `interval` parameter (e.g., "5m", "1mo")
    pub interval: &'static str,
}

/// Dashboard chart range.
///
/// Unknown or missing labels fall back to [`ChartRange::OneDay`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChartRange {
    #[default]
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    OneYear,
    All,
}

impl ChartRange {
    pub const ALL_RANGES: [ChartRange; 6] = [
        ChartRange::OneDay,
        ChartRange::FiveDays,
        ChartRange::OneMonth,
        ChartRange::ThreeMonths,
        ChartRange::OneYear,
        ChartRange::All,
    ];

    /// Parses a range label, case-insensitively.
    pub fn parse(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Self::default();
        };
        let label = label.trim();
        Self::ALL_RANGES
            .into_iter()
            .find(|range| range.label().eq_ignore_ascii_case(label))
            .unwrap_or_default()
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartRange::OneDay => "1D",
            ChartRange::FiveDays => "5D",
            ChartRange::OneMonth => "1M",
            ChartRange::ThreeMonths => "3M",
            ChartRange::OneYear => "1Y",
            ChartRange::All => "ALL",
        }
    }

    pub fn window(&self) -> ChartWindow {
        let (range, interval) = match self {
            ChartRange::OneDay => ("1d", "5m"),
            ChartRange::FiveDays => ("5d", "15m"),
            ChartRange::OneMonth => ("1mo", "1h"),
            ChartRange::ThreeMonths => ("3mo", "1d"),
            ChartRange::OneYear => ("1y", "1d"),
            ChartRange::All => ("max", "1mo"),
        };
        ChartWindow { range, interval }
    }
}

impl fmt::Display for ChartRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single chart point.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// ISO-8601 UTC time with millisecond precision
    pub time: String,
    pub price: f64,
    pub timestamp_millis: i64,
}

/// Price series for one symbol and range, in provider order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSeries {
    pub symbol: String,
    pub range: String,
    pub points: Vec<ChartPoint>,
}
