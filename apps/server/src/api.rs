mod health;
mod market_data;

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Json, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    config::Config,
    error::ErrorBody,
    main_lib::AppState,
    models::{
        ChartPointResponse, ChartResponse, NewsResponse, QuoteResponse, SearchResponseBody,
        SearchResultResponse,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::readyz,
        market_data::get_quote,
        market_data::get_chart,
        market_data::search,
        market_data::get_news
    ),
    components(schemas(
        QuoteResponse,
        ChartResponse,
        ChartPointResponse,
        SearchResponseBody,
        SearchResultResponse,
        NewsResponse,
        ErrorBody
    )),
    tags((name="stockpulse"))
)]
pub struct ApiDoc;

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allow.is_empty() || config.cors_allow.iter().any(|o| o == "*") {
        return CorsLayer::new().allow_origin(Any);
    }
    let origins = config
        .cors_allow
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect::<Vec<_>>();
    CorsLayer::new().allow_origin(origins)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let openapi = ApiDoc::openapi();

    let api = Router::new()
        .merge(health::router())
        .merge(market_data::router());

    Router::new()
        .nest("/api/v1", api)
        .route("/openapi.json", get(|| async { Json(openapi) }))
        .with_state(state)
        .layer(cors_layer(config))
        // Set must wrap Propagate so a generated id reaches the response.
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
