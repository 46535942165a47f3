//! Request and result types for sentiment analysis

use crate::error::{Result, SentimentError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of characters kept in a result reason
pub const REASON_MAX_CHARS: usize = 200;

/// Marker appended to a reason that was cut at [`REASON_MAX_CHARS`]
pub const TRUNCATION_MARKER: &str = "...";

/// Sentiment classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    /// News is favourable for the stock
    Positive,
    /// News is unfavourable for the stock
    Negative,
    /// No clear lean either way
    Neutral,
}

impl Sentiment {
    /// Label used on the wire and in prompts
    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
            Sentiment::Neutral => "Neutral",
        }
    }

    /// Parse a label, ignoring case and surrounding whitespace
    ///
    /// ```
    /// use sentiment_core::Sentiment;
    ///
    /// assert_eq!(Sentiment::from_label(" positive "), Some(Sentiment::Positive));
    /// assert_eq!(Sentiment::from_label("NEGATIVE"), Some(Sentiment::Negative));
    /// assert_eq!(Sentiment::from_label("bullish"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positive" => Some(Sentiment::Positive),
            "negative" => Some(Sentiment::Negative),
            "neutral" => Some(Sentiment::Neutral),
            _ => None,
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated analysis request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    symbol: String,
    texts: Vec<String>,
}

impl AnalysisRequest {
    /// Validate and build a request
    ///
    /// The symbol must contain a non-whitespace character and at least one
    /// news item must be given. Blank news items are accepted; they simply
    /// carry no signal.
    pub fn new(symbol: impl Into<String>, texts: Vec<String>) -> Result<Self> {
        let symbol = symbol.into();

        if symbol.trim().is_empty() {
            return Err(SentimentError::InvalidRequest(
                "symbol must not be empty".to_string(),
            ));
        }

        if texts.is_empty() {
            return Err(SentimentError::InvalidRequest(
                "news list must not be empty".to_string(),
            ));
        }

        Ok(Self { symbol, texts })
    }

    /// Stock symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// News snippets in the order given
    pub fn texts(&self) -> &[String] {
        &self.texts
    }
}

/// Outcome of a sentiment analysis
///
/// Construction enforces the result invariants: confidence lies in
/// `[0.0, 1.0]`, the reason is non-empty and at most [`REASON_MAX_CHARS`]
/// characters plus [`TRUNCATION_MARKER`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    symbol: String,
    sentiment: Sentiment,
    reason: String,
    confidence_score: f64,
}

impl AnalysisResult {
    /// Build a result, normalising reason and confidence
    pub fn new(
        symbol: impl Into<String>,
        sentiment: Sentiment,
        reason: impl Into<String>,
        confidence: f64,
    ) -> Self {
        let reason = reason.into();
        let reason = if reason.trim().is_empty() {
            sentiment.as_str().to_string()
        } else {
            truncate_reason(&reason)
        };

        Self {
            symbol: symbol.into(),
            sentiment,
            reason,
            confidence_score: clamp_confidence(confidence),
        }
    }

    /// Symbol echoed from the request
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Sentiment classification
    pub fn sentiment(&self) -> Sentiment {
        self.sentiment
    }

    /// Human-readable rationale
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Confidence in `[0.0, 1.0]`
    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }
}

/// Clamp into `[0.0, 1.0]`; NaN maps to 0.0
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Cut `text` to [`REASON_MAX_CHARS`] characters, appending the marker if cut
pub fn truncate_reason(text: &str) -> String {
    match text.char_indices().nth(REASON_MAX_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_validation() {
        let request = AnalysisRequest::new("AAPL", vec!["科技股上涨".to_string()]).unwrap();
        assert_eq!(request.symbol(), "AAPL");
        assert_eq!(request.texts().len(), 1);

        assert!(matches!(
            AnalysisRequest::new("AAPL", vec![]),
            Err(SentimentError::InvalidRequest(_))
        ));
        assert!(matches!(
            AnalysisRequest::new("  ", vec!["news".to_string()]),
            Err(SentimentError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_request_accepts_blank_items() {
        let request = AnalysisRequest::new("AAPL", vec![String::new(), "  ".to_string()]);
        assert!(request.is_ok());
    }

    #[test]
    fn test_sentiment_labels() {
        assert_eq!(Sentiment::Positive.to_string(), "Positive");
        assert_eq!(Sentiment::from_label("Neutral"), Some(Sentiment::Neutral));
        assert_eq!(Sentiment::from_label(""), None);
    }

    #[test]
    fn test_result_clamps_confidence() {
        let high = AnalysisResult::new("A", Sentiment::Positive, "ok", 1.7);
        assert_eq!(high.confidence_score(), 1.0);

        let low = AnalysisResult::new("A", Sentiment::Negative, "ok", -0.2);
        assert_eq!(low.confidence_score(), 0.0);

        let nan = AnalysisResult::new("A", Sentiment::Neutral, "ok", f64::NAN);
        assert_eq!(nan.confidence_score(), 0.0);
    }

    #[test]
    fn test_result_never_has_empty_reason() {
        let result = AnalysisResult::new("A", Sentiment::Negative, "   ", 0.5);
        assert_eq!(result.reason(), "Negative");
    }

    #[test]
    fn test_truncate_reason_counts_characters() {
        let short = "利好".repeat(100);
        assert_eq!(truncate_reason(&short), short);

        let long = "利".repeat(250);
        let cut = truncate_reason(&long);
        assert_eq!(cut.chars().count(), REASON_MAX_CHARS + TRUNCATION_MARKER.len());
        assert!(cut.ends_with(TRUNCATION_MARKER));
        assert!(cut.starts_with(&"利".repeat(REASON_MAX_CHARS)));
    }

    #[test]
    fn test_result_serialization() {
        let result = AnalysisResult::new("AAPL", Sentiment::Positive, "新产品发布", 0.85);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert_eq!(json["sentiment"], "Positive");
        assert_eq!(json["reason"], "新产品发布");
        assert_eq!(json["confidence_score"], 0.85);
    }
}
