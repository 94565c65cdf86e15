//! Yahoo Finance chart provider.
//!
//! Quotes, chart series and multi-exchange search are all served from the
//! public `/v8/finance/chart/{symbol}` endpoint. Without `range`/`interval`
//! parameters it returns the current session metadata used for quotes.

mod models;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::debug;
use urlencoding::encode;

use crate::errors::MarketDataError;
use crate::models::{ChartPayload, ChartWindow};
use crate::provider::{classify_response, ProviderConfig, QuoteProvider, RateLimiter};

use models::YahooChartResponse;

pub const PROVIDER_ID: &str = "YAHOO";
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// The endpoint rejects requests without a browser-like user agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Yahoo Finance chart client.
pub struct YahooProvider {
    client: Client,
    config: ProviderConfig,
    limiter: Arc<RateLimiter>,
}

impl YahooProvider {
    pub fn new(config: ProviderConfig, limiter: Arc<RateLimiter>) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                MarketDataError::NotConfigured(format!("Failed to build Yahoo HTTP client: {}", e))
            })?;
        limiter.configure(PROVIDER_ID, config.rate_limit.clone());

        Ok(Self {
            client,
            config,
            limiter,
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        self.config
            .endpoint(&format!("/v8/finance/chart/{}", encode(symbol)))
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        window: Option<ChartWindow>,
    ) -> Result<ChartPayload, MarketDataError> {
        let mut request = self
            .client
            .get(self.chart_url(symbol))
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::ACCEPT, "application/json");
        if let Some(window) = window {
            request = request.query(&[("range", window.range), ("interval", window.interval)]);
        }

        self.limiter.acquire(PROVIDER_ID).await;
        debug!("Fetching Yahoo chart for {} ({:?})", symbol, window);

        let response = request
            .send()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, &e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .text()
            .await
            .map_err(|e| MarketDataError::from_transport(PROVIDER_ID, &e))?;

        let body = chart_body(symbol, status, content_type.as_deref(), &body)?;
        parse_chart(symbol, body)
    }
}

/// Classifies a chart response; a 404 means Yahoo does not know the symbol.
fn chart_body<'a>(
    symbol: &str,
    status: u16,
    content_type: Option<&str>,
    body: &'a str,
) -> Result<&'a str, MarketDataError> {
    match classify_response(PROVIDER_ID, status, content_type, body) {
        Err(MarketDataError::UpstreamStatus { status: 404, .. }) => {
            Err(MarketDataError::SymbolNotFound(symbol.to_string()))
        }
        other => other,
    }
}

/// Extracts the first chart result from a JSON body.
pub fn parse_chart(symbol: &str, body: &str) -> Result<ChartPayload, MarketDataError> {
    let response: YahooChartResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse chart response: {}", e),
        })?;

    let result = response
        .chart
        .and_then(|chart| chart.result)
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

    let meta = result.meta.ok_or_else(|| MarketDataError::InvalidData {
        message: format!("{}: chart result has no meta", symbol),
    })?;

    let closes = result
        .indicators
        .and_then(|indicators| indicators.quote.into_iter().next())
        .and_then(|quote| quote.close)
        .unwrap_or_default();

    Ok(ChartPayload {
        meta: meta.into(),
        timestamps: result.timestamp.unwrap_or_default(),
        closes,
    })
}
