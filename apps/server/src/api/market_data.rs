use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use stockpulse_market_data::ChartRange;

use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    main_lib::AppState,
    models::{
        ChartQuery, ChartResponse, NewsResponse, QuoteResponse, SearchQuery, SearchResponseBody,
    },
};

#[utoipa::path(
    get,
    path = "/api/v1/quote/{ticker}",
    params(("ticker" = String, Path, description = "Ticker symbol, e.g. AAPL or RELIANCE.NS")),
    responses(
        (status = 200, body = QuoteResponse),
        (status = 404, body = ErrorBody),
        (status = 429, body = ErrorBody),
        (status = 502, body = ErrorBody)
    )
)]
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<QuoteResponse>> {
    let quote = state.market_data.quote(&ticker).await?;
    Ok(Json(quote.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/quote/{ticker}/chart",
    params(
        ("ticker" = String, Path, description = "Ticker symbol"),
        ("range" = Option<String>, Query, description = "1D, 5D, 1M, 3M, 1Y or ALL; defaults to 1D")
    ),
    responses(
        (status = 200, body = ChartResponse),
        (status = 429, body = ErrorBody),
        (status = 500, body = ErrorBody)
    )
)]
pub async fn get_chart(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<ChartResponse>> {
    let range = ChartRange::parse(query.range.as_deref());
    let series = state
        .market_data
        .chart(&ticker, range)
        .await
        .map_err(ApiError::Chart)?;
    Ok(Json(series.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(("q" = String, Query, description = "Company or ticker to look up")),
    responses(
        (status = 200, body = SearchResponseBody),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResponseBody>> {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Query parameter is required".to_string()))?;
    let response = state.market_data.search(&q).await?;
    Ok(Json(response.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/news/{ticker}",
    params(("ticker" = String, Path, description = "Ticker symbol")),
    responses(
        (status = 200, body = NewsResponse),
        (status = 500, body = ErrorBody)
    )
)]
pub async fn get_news(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<NewsResponse>> {
    let digest = state
        .market_data
        .news(&ticker)
        .await
        .map_err(ApiError::News)?;
    Ok(Json(digest.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quote/{ticker}", get(get_quote))
        .route("/quote/{ticker}/chart", get(get_chart))
        .route("/search", get(search))
        .route("/news/{ticker}", get(get_news))
}
