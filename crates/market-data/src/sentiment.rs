//! Keyword sentiment scoring for news headlines.

use crate::models::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "growth", "profit", "gain", "rise", "up", "strong", "bullish", "upgrade", "beat", "surge",
];

const NEGATIVE_WORDS: &[&str] = &[
    "loss",
    "fall",
    "down",
    "weak",
    "bearish",
    "downgrade",
    "miss",
    "decline",
    "drop",
    "crash",
];

/// Scores above this are positive, below its negation negative.
const NEUTRAL_BAND: f64 = 0.1;

/// Result of scoring a set of headlines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SentimentScore {
    pub sentiment: Sentiment,
    /// Absolute value of the mean keyword score
    pub magnitude: f64,
}

/// Scores headlines by keyword matching.
///
/// Each space-separated word counts +1 when it contains a positive keyword,
/// otherwise -1 when it contains a negative one. The score is the mean over
/// matched words.
pub fn score_headlines<S: AsRef<str>>(headlines: &[S]) -> SentimentScore {
    let mut total = 0i64;
    let mut matched = 0u64;

    for headline in headlines {
        let lowered = headline.as_ref().to_lowercase();
        for word in lowered.split(' ') {
            if POSITIVE_WORDS.iter().any(|kw| word.contains(kw)) {
                total += 1;
                matched += 1;
            } else if NEGATIVE_WORDS.iter().any(|kw| word.contains(kw)) {
                total -= 1;
                matched += 1;
            }
        }
    }

    let score = if matched > 0 {
        total as f64 / matched as f64
    } else {
        0.0
    };

    let sentiment = if score > NEUTRAL_BAND {
        Sentiment::Positive
    } else if score < -NEUTRAL_BAND {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    };

    SentimentScore {
        sentiment,
        magnitude: score.abs(),
    }
}
