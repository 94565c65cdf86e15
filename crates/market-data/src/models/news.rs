//! News headlines with keyword sentiment.

use serde::Serialize;

/// Overall sentiment label for a set of headlines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsDigest {
    pub headlines: Vec<String>,
    pub sentiment: Sentiment,
    /// Magnitude of the keyword score, always `>= 0`
    pub sentiment_score: f64,
    pub total_articles: u64,
}
