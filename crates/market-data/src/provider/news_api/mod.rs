//! NewsAPI headline provider.
//!
//! Uses the `/v2/everything` search endpoint, newest first, five articles
//! per request. The API key is sent as a header, never in the URL.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::Deserialize;
use tracing::debug;

use crate::errors::MarketDataError;
use crate::models::NewsPayload;
use crate::provider::{classify_response, NewsProvider, ProviderConfig, RateLimiter};

pub const PROVIDER_ID: &str = "NEWS_API";
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";
const PAGE_SIZE: &str = "5";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    /// "ok" or "error"
    status: Option<String>,
    message: Option<String>,
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
}

/// NewsAPI client. Requests fail with `NotConfigured` until a key is set.
pub struct NewsApiProvider {
    client: Client,
    config: ProviderConfig,
    api_key: Option<String>,
    limiter: Arc<RateLimiter>,
}

impl NewsApiProvider {
    pub fn new(
        config: ProviderConfig,
        api_key: Option<String>,
        limiter: Arc<RateLimiter>,
    ) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                MarketDataError::NotConfigured(format!("Failed to build NewsAPI HTTP client: {}", e))
            })?;
        limiter.configure(PROVIDER_ID, config.rate_limit.clone());

        Ok(Self {
            client,
            config,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            limiter,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn fetch_articles(&self, query: &str) -> Result<NewsPayload, MarketDataError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| MarketDataError::NotConfigured("NewsAPI key is not set".to_string()))?;

        let request = self
            .client
            .get(self.config.endpoint("/v2/everything"))
            .header("X-Api-Key", api_key)
            .header(header::ACCEPT, "application/json")
            .query(&[
                ("q", query),
                ("language", "en"),
                ("sortBy", "publishedAt"),
                ("pageSize", PAGE_SIZE),
            ]);

        self.limiter.acquire(PROVIDER_ID).await;
        debug!("Fetching NewsAPI articles for '{}'", query);

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

        let body = classify_response(PROVIDER_ID, status, content_type.as_deref(), &body)?;
        parse_articles(body)
    }
}

fn parse_articles(body: &str) -> Result<NewsPayload, MarketDataError> {
    let response: EverythingResponse =
        serde_json::from_str(body).map_err(|e| MarketDataError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to parse articles response: {}", e),
        })?;

    if response.status.as_deref() == Some("error") {
        return Err(MarketDataError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message: response
                .message
                .unwrap_or_else(|| "error status without message".to_string()),
        });
    }

    Ok(NewsPayload {
        titles: response.articles.into_iter().map(|a| a.title).collect(),
        total_results: response.total_results,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_articles() {
        let body = r#"{
            "status": "ok",
            "totalResults": 128,
            "articles": [
                {"title": "Apple beats estimates", "source": {"name": "Wire"}},
                {"title": null},
                {"title": "Apple shares rise"}
            ]
        }"#;
        let payload = parse_articles(body).unwrap();
        assert_eq!(payload.total_results, Some(128));
        assert_eq!(payload.titles.len(), 3);
        assert_eq!(payload.titles[1], None);
    }

    #[test]
    fn test_error_status_is_malformed() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        assert_eq!(
            parse_articles(body),
            Err(MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: "Your API key is invalid.".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_not_configured() {
        let provider = NewsApiProvider::new(
            ProviderConfig::new(DEFAULT_BASE_URL),
            Some("   ".to_string()),
            Arc::new(RateLimiter::new()),
        )
        .unwrap();
        assert!(!provider.has_api_key());
        assert!(matches!(
            provider.fetch_articles("AAPL stock").await,
            Err(MarketDataError::NotConfigured(_))
        ));
    }
}
