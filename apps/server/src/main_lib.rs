use std::sync::Arc;

use crate::config::Config;
use stockpulse_market_data::{
    MarketDataService, MarketDataSettings, NewsApiProvider, NewsProvider, ProviderConfig,
    QuoteProvider, RateLimitConfig, RateLimiter, YahooProvider,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Burst allowance for the Yahoo token bucket.
const YAHOO_BURST_CAPACITY: f64 = 10.0;

pub struct AppState {
    pub market_data: Arc<MarketDataService>,
}

impl AppState {
    pub fn new(
        quote_provider: Arc<dyn QuoteProvider>,
        news_provider: Arc<dyn NewsProvider>,
        settings: &MarketDataSettings,
    ) -> Self {
        Self {
            market_data: Arc::new(MarketDataService::new(
                quote_provider,
                news_provider,
                settings,
            )),
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("SP_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let limiter = Arc::new(RateLimiter::new());

    let yahoo_config = ProviderConfig::new(config.yahoo_base_url.clone())
        .with_timeout(config.upstream_timeout)
        .with_rate_limit(RateLimitConfig {
            requests_per_minute: config.yahoo_requests_per_minute,
            burst_capacity: YAHOO_BURST_CAPACITY,
        });
    let yahoo = YahooProvider::new(yahoo_config, Arc::clone(&limiter))?;
    tracing::info!(
        "Quote provider {} at {} ({} req/min)",
        yahoo.id(),
        config.yahoo_base_url,
        config.yahoo_requests_per_minute
    );

    let news_config =
        ProviderConfig::new(config.news_base_url.clone()).with_timeout(config.upstream_timeout);
    let news = NewsApiProvider::new(news_config, config.news_api_key.clone(), limiter)?;
    if news.has_api_key() {
        tracing::info!("News provider {} at {}", news.id(), config.news_base_url);
    } else {
        tracing::warn!("SP_NEWS_API_KEY is not set; news requests will fail");
    }

    Ok(Arc::new(AppState::new(
        Arc::new(yahoo),
        Arc::new(news),
        &config.market_data,
    )))
}
