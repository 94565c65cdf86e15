//! Market data models
//!
//! - `payload` - Provider payloads before normalization (ChartPayload, ChartMeta, NewsPayload)
//! - `quote` - Normalized quote (Quote)
//! - `chart` - Chart ranges and normalized series (ChartRange, ChartWindow, ChartSeries)
//! - `search` - Multi-exchange search results (SearchResult, SearchResponse)
//! - `news` - Headlines with sentiment (NewsDigest, Sentiment)

mod chart;
mod news;
mod payload;
mod quote;
mod search;

pub use chart::{ChartPoint, ChartRange, ChartSeries, ChartWindow};
pub use news::{NewsDigest, Sentiment};
pub use payload::{ChartMeta, ChartPayload, NewsPayload};
pub use quote::Quote;
pub use search::{SearchResponse, SearchResult};
