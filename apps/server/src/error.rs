use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stockpulse_market_data::MarketDataError;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    /// Quote and search failures, mapped variant by variant.
    #[error(transparent)]
    MarketData(#[from] MarketDataError),
    /// Chart failures: rate limits keep their 429, everything else is a 500.
    #[error("Failed to fetch chart data")]
    Chart(#[source] MarketDataError),
    /// News failures are always a 500.
    #[error("Failed to fetch news data")]
    News(#[source] MarketDataError),
}

#[derive(Serialize, ToSchema, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Seconds the client should wait before retrying
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

impl ErrorBody {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
            retry_after: None,
        }
    }

    fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn rate_limited(err: &MarketDataError) -> (StatusCode, ErrorBody) {
    let mut body = ErrorBody::new("Rate limit exceeded")
        .with_details("Too many requests to the quote provider. Please try again later.");
    body.retry_after = err.retry_after().map(|d| d.as_secs());
    (StatusCode::TOO_MANY_REQUESTS, body)
}

fn market_data_response(err: &MarketDataError) -> (StatusCode, ErrorBody) {
    match err {
        MarketDataError::InvalidRequest(reason) => {
            (StatusCode::BAD_REQUEST, ErrorBody::new(reason.clone()))
        }
        MarketDataError::SymbolNotFound(_) => (
            StatusCode::NOT_FOUND,
            ErrorBody::new("Stock not found or invalid ticker symbol").with_details(err.to_string()),
        ),
        MarketDataError::RateLimited { .. } => rate_limited(err),
        MarketDataError::MalformedResponse { .. } => (
            StatusCode::BAD_GATEWAY,
            ErrorBody::new("Invalid data format received from provider")
                .with_details(err.to_string()),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorBody::new("Failed to fetch stock data. Please try again.")
                .with_details(err.to_string()),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, ErrorBody::new(reason.clone())),
            ApiError::MarketData(err) => market_data_response(err),
            ApiError::Chart(err) if err.is_rate_limited() => rate_limited(err),
            ApiError::Chart(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody::new(self.to_string()).with_details(err.to_string()),
            ),
            ApiError::News(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorBody::new(self.to_string())),
        };

        if status.is_server_error() {
            match &self {
                ApiError::Chart(err) | ApiError::News(err) => {
                    tracing::error!("{}: {}", self, err)
                }
                _ => tracing::error!("{}", self),
            }
        } else {
            tracing::debug!("Request rejected with {}: {}", status, self);
        }

        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
