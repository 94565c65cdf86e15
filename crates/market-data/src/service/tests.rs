use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::time::Instant;

use super::*;
use crate::models::{ChartMeta, ChartPayload, ChartWindow, NewsPayload, Sentiment};

#[derive(Default)]
struct MockQuoteProvider {
    responses: Mutex<HashMap<String, Result<ChartPayload, MarketDataError>>>,
    requests: Mutex<Vec<(String, Option<ChartWindow>)>>,
    calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl MockQuoteProvider {
    fn respond(&self, symbol: &str, result: Result<ChartPayload, MarketDataError>) {
        self.responses
            .lock()
            .unwrap()
            .insert(symbol.to_string(), result);
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn requested_symbols(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(symbol, _)| symbol.clone())
            .collect()
    }
}

#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn id(&self) -> &'static str {
        "MOCK"
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        window: Option<ChartWindow>,
    ) -> Result<ChartPayload, MarketDataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        self.requests
            .lock()
            .unwrap()
            .push((symbol.to_string(), window));

        tokio::time::sleep(Duration::from_millis(200)).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| Err(MarketDataError::SymbolNotFound(symbol.to_string())))
    }
}

#[derive(Default)]
struct MockNewsProvider {
    queries: Mutex<Vec<String>>,
    response: Mutex<Option<Result<NewsPayload, MarketDataError>>>,
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    fn id(&self) -> &'static str {
        "MOCK_NEWS"
    }

    async fn fetch_articles(&self, query: &str) -> Result<NewsPayload, MarketDataError> {
        self.queries.lock().unwrap().push(query.to_string());
        self.response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(NewsPayload::default()))
    }
}

fn meta_payload(price: f64, previous_close: f64) -> ChartPayload {
    ChartPayload {
        meta: ChartMeta {
            regular_market_price: Some(price),
            previous_close: Some(previous_close),
            currency: Some("USD".to_string()),
            exchange_name: Some("NMS".to_string()),
            ..Default::default()
        },
        ..Default::default()
    }
}

struct Harness {
    quotes: Arc<MockQuoteProvider>,
    news: Arc<MockNewsProvider>,
    service: MarketDataService,
}

fn harness() -> Harness {
    let quotes = Arc::new(MockQuoteProvider::default());
    let news = Arc::new(MockNewsProvider::default());
    let service = MarketDataService::new(
        quotes.clone(),
        news.clone(),
        &MarketDataSettings::default(),
    );
    Harness {
        quotes,
        news,
        service,
    }
}

// ---------------------------------------------------------------------------
// Quotes
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_concurrent_quote_requests_issue_one_fetch() {
    let h = harness();
    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));

    let results = join_all((0..10).map(|_| h.service.quote("AAPL"))).await;

    assert_eq!(h.quotes.calls(), 1);
    assert_eq!(h.quotes.max_active.load(Ordering::SeqCst), 1);
    let first = results[0].clone().unwrap();
    assert!(results.iter().all(|r| r.as_ref() == Ok(&first)));
}

#[tokio::test(start_paused = true)]
async fn test_quote_derived_fields() {
    let h = harness();
    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));

    let quote = h.service.quote("AAPL").await.unwrap();
    assert_eq!(quote.symbol, "AAPL");
    assert_eq!(quote.price, 150.0);
    assert_eq!(quote.change, 50.0);
    assert_eq!(quote.change_percent, 50.0);
    assert_eq!(quote.currency, "USD");
    assert_eq!(quote.market_state, "UNKNOWN");
}

#[tokio::test(start_paused = true)]
async fn test_quote_cached_within_ttl_and_refetched_after() {
    let h = harness();
    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));

    h.service.quote("AAPL").await.unwrap();
    tokio::time::advance(Duration::from_secs(60)).await;
    h.service.quote("AAPL").await.unwrap();
    assert_eq!(h.quotes.calls(), 1);

    tokio::time::advance(Duration::from_secs(5 * 60)).await;
    h.quotes.respond("AAPL", Ok(meta_payload(160.0, 100.0)));
    let refreshed = h.service.quote("AAPL").await.unwrap();
    assert_eq!(h.quotes.calls(), 2);
    assert_eq!(refreshed.price, 160.0);
}

#[tokio::test(start_paused = true)]
async fn test_quote_case_variants_share_cache() {
    let h = harness();
    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));

    h.service.quote("aapl").await.unwrap();
    h.service.quote("  AAPL ").await.unwrap();
    assert_eq!(h.quotes.calls(), 1);
    assert_eq!(h.quotes.requested_symbols(), vec!["AAPL".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_quote_fetch_waits_configured_delay() {
    let h = harness();
    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));

    let start = Instant::now();
    h.service.quote("AAPL").await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));

    let start = Instant::now();
    h.service.quote("AAPL").await.unwrap();
    assert!(start.elapsed() < Duration::from_millis(1));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_quote_serves_cached_value() {
    let h = harness();
    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));
    let original = h.service.quote("AAPL").await.unwrap();

    tokio::time::advance(Duration::from_secs(10 * 60)).await;
    h.quotes
        .respond("AAPL", Err(MarketDataError::rate_limited("MOCK")));

    let results = join_all((0..3).map(|_| h.service.quote("AAPL"))).await;
    assert_eq!(h.quotes.calls(), 2);
    for result in results {
        assert_eq!(result, Ok(original.clone()));
    }
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_quote_without_cache_errors() {
    let h = harness();
    h.quotes
        .respond("AAPL", Err(MarketDataError::rate_limited("MOCK")));

    let err = h.service.quote("AAPL").await.unwrap_err();
    assert!(err.is_rate_limited());
    assert_eq!(err.retry_after(), Some(Duration::from_secs(60)));
}

#[tokio::test(start_paused = true)]
async fn test_failed_quote_is_not_cached() {
    let h = harness();
    h.quotes.respond(
        "AAPL",
        Err(MarketDataError::MalformedResponse {
            provider: "MOCK".to_string(),
            message: "html".to_string(),
        }),
    );
    assert!(h.service.quote("AAPL").await.is_err());

    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));
    assert!(h.service.quote("AAPL").await.is_ok());
    assert_eq!(h.quotes.calls(), 2);
}

#[tokio::test]
async fn test_blank_ticker_is_invalid() {
    let h = harness();
    assert!(matches!(
        h.service.quote("   ").await,
        Err(MarketDataError::InvalidRequest(_))
    ));
    assert!(matches!(
        h.service.chart("", ChartRange::OneDay).await,
        Err(MarketDataError::InvalidRequest(_))
    ));
    assert!(matches!(
        h.service.search(" ").await,
        Err(MarketDataError::InvalidRequest(_))
    ));
    assert_eq!(h.quotes.calls(), 0);
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_chart_filters_points_and_uses_range_window() {
    let h = harness();
    h.quotes.respond(
        "MSFT",
        Ok(ChartPayload {
            timestamps: vec![1, 2, 3],
            closes: vec![Some(10.0), Some(-1.0), Some(12.0)],
            ..meta_payload(12.0, 10.0)
        }),
    );

    let series = h.service.chart("msft", ChartRange::OneMonth).await.unwrap();
    assert_eq!(series.symbol, "MSFT");
    assert_eq!(series.range, "1M");
    let prices: Vec<f64> = series.points.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![10.0, 12.0]);

    let requests = h.quotes.requests.lock().unwrap().clone();
    assert_eq!(
        requests,
        vec![(
            "MSFT".to_string(),
            Some(ChartWindow {
                range: "1mo",
                interval: "1h"
            })
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn test_chart_cache_is_per_range_with_short_ttl() {
    let h = harness();
    h.quotes.respond("MSFT", Ok(meta_payload(12.0, 10.0)));

    h.service.chart("MSFT", ChartRange::OneDay).await.unwrap();
    h.service.chart("MSFT", ChartRange::OneDay).await.unwrap();
    h.service.chart("MSFT", ChartRange::OneYear).await.unwrap();
    assert_eq!(h.quotes.calls(), 2);

    tokio::time::advance(Duration::from_secs(31)).await;
    h.service.chart("MSFT", ChartRange::OneDay).await.unwrap();
    assert_eq!(h.quotes.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_chart_rate_limit_is_surfaced() {
    let h = harness();
    h.quotes.respond("MSFT", Ok(meta_payload(12.0, 10.0)));
    h.service.chart("MSFT", ChartRange::OneDay).await.unwrap();

    tokio::time::advance(Duration::from_secs(31)).await;
    h.quotes
        .respond("MSFT", Err(MarketDataError::rate_limited("MOCK")));
    let err = h
        .service
        .chart("MSFT", ChartRange::OneDay)
        .await
        .unwrap_err();
    assert!(err.is_rate_limited());
}

#[tokio::test(start_paused = true)]
async fn test_keyspaces_are_independent() {
    let h = harness();
    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));

    h.service.quote("AAPL").await.unwrap();
    h.service.chart("AAPL", ChartRange::OneDay).await.unwrap();
    assert_eq!(h.quotes.calls(), 2);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn test_search_skips_failed_exchanges() {
    let h = harness();
    h.quotes.respond("INFY.NS", Ok(meta_payload(1500.0, 1480.0)));
    h.quotes
        .respond("INFY.BO", Err(MarketDataError::rate_limited("MOCK")));

    let response = h.service.search("infy").await.unwrap();
    assert_eq!(response.query, "INFY");
    assert_eq!(response.results.len(), 1);
    let result = &response.results[0];
    assert_eq!(result.exchange, "NSE");
    assert_eq!(result.exchange_full_name, "National Stock Exchange");
    assert_eq!(result.original_query, "INFY");
    assert_eq!(result.quote.symbol, "INFY.NS");
    assert_eq!(
        h.quotes.requested_symbols(),
        vec!["INFY.NS", "INFY.BO", "INFY"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_search_with_suffix_skips_bare_lookup() {
    let h = harness();
    h.quotes.respond("TCS.NS", Ok(meta_payload(3900.0, 3880.0)));
    h.quotes.respond("TCS.BO", Ok(meta_payload(3901.0, 3880.0)));

    let response = h.service.search("tcs.bo").await.unwrap();
    assert_eq!(response.query, "TCS");
    let exchanges: Vec<&str> = response
        .results
        .iter()
        .map(|r| r.exchange.as_str())
        .collect();
    assert_eq!(exchanges, vec!["NSE", "BSE"]);
    assert_eq!(h.quotes.requested_symbols(), vec!["TCS.NS", "TCS.BO"]);
}

#[tokio::test(start_paused = true)]
async fn test_search_bare_query_is_international() {
    let h = harness();
    h.quotes.respond("AAPL", Ok(meta_payload(150.0, 100.0)));

    let response = h.service.search("AAPL").await.unwrap();
    assert_eq!(response.results.len(), 1);
    let result = &response.results[0];
    assert_eq!(result.exchange, "INTL");
    assert_eq!(result.exchange_full_name, "NMS");
    assert_eq!(result.original_query, "AAPL");
}

#[tokio::test(start_paused = true)]
async fn test_search_bare_query_keeps_default_exchange_name() {
    let h = harness();
    let mut payload = meta_payload(42.0, 40.0);
    payload.meta.exchange_name = None;
    h.quotes.respond("XYZ", Ok(payload));

    let response = h.service.search("XYZ").await.unwrap();
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].exchange, "INTL");
    assert_eq!(response.results[0].exchange_full_name, "Unknown Exchange");
}

#[tokio::test(start_paused = true)]
async fn test_search_with_no_matches_is_empty_and_cached() {
    let h = harness();

    let response = h.service.search("ZZZZ").await.unwrap();
    assert!(response.results.is_empty());
    assert_eq!(h.quotes.calls(), 3);

    h.service.search("zzzz").await.unwrap();
    assert_eq!(h.quotes.calls(), 3);

    tokio::time::advance(Duration::from_secs(5 * 60)).await;
    h.service.search("ZZZZ").await.unwrap();
    assert_eq!(h.quotes.calls(), 6);
}

// ---------------------------------------------------------------------------
// News
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_news_strips_exchange_suffix_and_scores() {
    let h = harness();
    *h.news.response.lock().unwrap() = Some(Ok(NewsPayload {
        titles: vec![
            Some("Stock sees strong growth".to_string()),
            Some("Profit up sharply".to_string()),
        ],
        total_results: Some(17),
    }));

    let digest = h.service.news("reliance.ns").await.unwrap();
    assert_eq!(digest.sentiment, Sentiment::Positive);
    assert_eq!(digest.total_articles, 17);
    assert_eq!(digest.headlines.len(), 2);
    assert_eq!(
        h.news.queries.lock().unwrap().clone(),
        vec!["reliance stock".to_string()]
    );
}

#[tokio::test]
async fn test_news_is_not_cached_and_errors_propagate() {
    let h = harness();
    h.service.news("AAPL").await.unwrap();
    h.service.news("AAPL").await.unwrap();
    assert_eq!(h.news.queries.lock().unwrap().len(), 2);

    *h.news.response.lock().unwrap() = Some(Err(MarketDataError::NotConfigured(
        "NewsAPI key is not set".to_string(),
    )));
    assert!(matches!(
        h.service.news("AAPL").await,
        Err(MarketDataError::NotConfigured(_))
    ));
}

#[test]
fn test_news_query() {
    assert_eq!(news_query("AAPL"), "AAPL stock");
    assert_eq!(news_query("INFY.NS"), "INFY stock");
    assert_eq!(news_query("BRK.B"), "BRK.B stock");
}
