//! StockPulse Market Data Crate
//!
//! Request coalescing and short-lived caching in front of the quote and
//! news providers used by the StockPulse dashboard.
//!
//! # Architecture
//!
//! ```text
//!   request ──> Service ──> CacheStore ── fresh hit ──────────────> result
//!                  │
//!                  └──> InFlightRegistry ── join running fetch ──> result
//!                            │
//!                            └── owner ──> Provider ──> normalize ──> CacheStore
//! ```
//!
//! # Core Types
//!
//! - [`MarketDataService`] - Entry point bundling the quote, chart, search and news services
//! - [`QuoteProvider`] / [`NewsProvider`] - Upstream seams, implemented by
//!   [`YahooProvider`] and [`NewsApiProvider`]
//! - [`CacheStore`] / [`InFlightRegistry`] / [`RequestCache`] - Caching and coalescing
//! - [`Quote`], [`ChartSeries`], [`SearchResponse`], [`NewsDigest`] - Normalized results

pub mod cache;
pub mod errors;
pub mod exchanges;
pub mod models;
pub mod normalize;
pub mod provider;
pub mod sentiment;
pub mod service;

pub use cache::{CacheKey, CacheStore, InFlightRegistry, RateLimitPolicy, RequestCache};
pub use errors::MarketDataError;
pub use models::{
    ChartPoint, ChartRange, ChartSeries, NewsDigest, Quote, SearchResponse, SearchResult,
    Sentiment,
};
pub use provider::news_api::NewsApiProvider;
pub use provider::yahoo::YahooProvider;
pub use provider::{NewsProvider, ProviderConfig, QuoteProvider, RateLimitConfig, RateLimiter};
pub use service::{MarketDataService, MarketDataSettings};
