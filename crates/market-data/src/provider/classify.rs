//! Classification of raw provider responses.
//!
//! Providers sometimes answer a throttled request with an HTML or plain
//! text page instead of a 429, so the body is inspected as well.

use crate::errors::MarketDataError;

const RATE_LIMIT_PHRASES: &[&str] = &["too many requests", "rate limit"];

/// Returns the body when it is a successful JSON response.
///
/// Order matters: a 429 wins over everything, then a non-JSON body is
/// either a disguised rate limit or malformed, then any other non-success
/// status is reported as such.
pub fn classify_response<'a>(
    provider: &str,
    status: u16,
    content_type: Option<&str>,
    body: &'a str,
) -> Result<&'a str, MarketDataError> {
    if status == 429 {
        return Err(MarketDataError::rate_limited(provider));
    }

    if !is_json(content_type) {
        if mentions_rate_limit(body) {
            return Err(MarketDataError::rate_limited(provider));
        }
        return Err(MarketDataError::MalformedResponse {
            provider: provider.to_string(),
            message: format!(
                "expected JSON, got {} (HTTP {})",
                content_type.unwrap_or("no content type"),
                status
            ),
        });
    }

    if !(200..300).contains(&status) {
        return Err(MarketDataError::UpstreamStatus {
            provider: provider.to_string(),
            status,
        });
    }

    Ok(body)
}

/// True when the body carries rate-limit phrasing, ignoring case.
pub fn mentions_rate_limit(body: &str) -> bool {
    let lowered = body.to_lowercase();
    RATE_LIMIT_PHRASES
        .iter()
        .any(|phrase| lowered.contains(phrase))
}

fn is_json(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| {
            let ct = ct.to_ascii_lowercase();
            ct.contains("application/json") || ct.contains("+json")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json;charset=utf-8");

    #[test]
    fn test_429_is_rate_limited() {
        let err = classify_response("YAHOO", 429, JSON, "{}").unwrap_err();
        assert_eq!(err, MarketDataError::rate_limited("YAHOO"));

        let err = classify_response("YAHOO", 429, Some("text/html"), "<html/>").unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_text_body_with_rate_limit_phrase() {
        let err = classify_response("YAHOO", 200, Some("text/plain"), "Too Many Requests")
            .unwrap_err();
        assert!(err.is_rate_limited());

        let err = classify_response(
            "YAHOO",
            503,
            Some("text/html"),
            "<p>You have hit the rate limit</p>",
        )
        .unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn test_other_text_body_is_malformed() {
        let err =
            classify_response("YAHOO", 200, Some("text/html"), "<html>Oops</html>").unwrap_err();
        assert!(matches!(err, MarketDataError::MalformedResponse { .. }));

        let err = classify_response("YAHOO", 200, None, "{}").unwrap_err();
        assert!(matches!(err, MarketDataError::MalformedResponse { .. }));
    }

    #[test]
    fn test_json_error_status() {
        let err = classify_response("NEWS_API", 401, JSON, r#"{"status":"error"}"#).unwrap_err();
        assert_eq!(
            err,
            MarketDataError::UpstreamStatus {
                provider: "NEWS_API".to_string(),
                status: 401
            }
        );
    }

    #[test]
    fn test_json_success_passes_body_through() {
        let body = r#"{"chart":{"result":[]}}"#;
        assert_eq!(classify_response("YAHOO", 200, JSON, body), Ok(body));
        assert_eq!(
            classify_response("YAHOO", 200, Some("application/vnd.api+json"), body),
            Ok(body)
        );
    }
}
