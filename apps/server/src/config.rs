use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use stockpulse_market_data::{
    provider::{news_api, yahoo},
    MarketDataSettings,
};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub upstream_timeout: Duration,
    pub yahoo_base_url: String,
    pub yahoo_requests_per_minute: u32,
    pub news_base_url: String,
    /// Never logged.
    pub news_api_key: Option<String>,
    pub market_data: MarketDataSettings,
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("SP_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid SP_LISTEN_ADDR")?;
        let cors_allow = env_or("SP_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let news_api_key = std::env::var("SP_NEWS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        let market_data = MarketDataSettings {
            quote_ttl: Duration::from_secs(env_u64("SP_QUOTE_TTL_SECS", 300)),
            chart_ttl: Duration::from_secs(env_u64("SP_CHART_TTL_SECS", 30)),
            search_ttl: Duration::from_secs(env_u64("SP_SEARCH_TTL_SECS", 300)),
            quote_fetch_delay: Duration::from_millis(env_u64("SP_QUOTE_FETCH_DELAY_MS", 1000)),
        };

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(env_u64("SP_REQUEST_TIMEOUT_MS", 30000)),
            upstream_timeout: Duration::from_millis(env_u64("SP_UPSTREAM_TIMEOUT_MS", 10000)),
            yahoo_base_url: env_or("SP_YAHOO_BASE_URL", yahoo::DEFAULT_BASE_URL),
            yahoo_requests_per_minute: env_u64("SP_YAHOO_REQUESTS_PER_MINUTE", 60)
                .try_into()
                .unwrap_or(60),
            news_base_url: env_or("SP_NEWS_BASE_URL", news_api::DEFAULT_BASE_URL),
            news_api_key,
            market_data,
        })
    }
}
