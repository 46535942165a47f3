//! Interpretation of provider replies
//!
//! Providers are asked for a JSON object but do not always comply. A reply is
//! read in two stages: first as structured JSON (bare, inside a Markdown code
//! fence, or embedded in prose), then as loose text scanned for sentiment
//! words.

use crate::config::ResponseLanguage;
use crate::model::{AnalysisResult, Sentiment, clamp_confidence};
use serde_json::{Map, Value};

const DEFAULT_STRUCTURED_CONFIDENCE: f64 = 0.7;
const LOOSE_CONFIDENCE: f64 = 0.8;

/// Fields extracted from a structured reply
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderVerdict {
    /// Declared sentiment, Neutral when missing or unrecognised
    pub sentiment: Sentiment,
    /// Declared reason, if a non-blank string was given
    pub reason: Option<String>,
    /// Declared confidence clamped into `[0.0, 1.0]`, 0.7 when missing
    pub confidence: f64,
}

/// How a provider reply was understood
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Reply carried a JSON object
    Structured(ProviderVerdict),
    /// Reply was free text
    Loose(String),
    /// Reply was empty
    Failed,
}

/// Classify a raw provider reply
pub fn parse_reply(raw: &str) -> ParseOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ParseOutcome::Failed;
    }

    match extract_object(trimmed) {
        Some(fields) => ParseOutcome::Structured(verdict_from_fields(&fields)),
        None => ParseOutcome::Loose(trimmed.to_string()),
    }
}

impl ParseOutcome {
    /// Turn the outcome into a result for `symbol`
    ///
    /// Returns `None` for [`ParseOutcome::Failed`].
    pub fn into_result(self, symbol: &str, language: ResponseLanguage) -> Option<AnalysisResult> {
        match self {
            ParseOutcome::Structured(verdict) => {
                let reason = verdict
                    .reason
                    .unwrap_or_else(|| provider_attribution(language).to_string());
                Some(AnalysisResult::new(
                    symbol,
                    verdict.sentiment,
                    reason,
                    verdict.confidence,
                ))
            }
            ParseOutcome::Loose(text) => Some(AnalysisResult::new(
                symbol,
                loose_sentiment(&text),
                text,
                LOOSE_CONFIDENCE,
            )),
            ParseOutcome::Failed => None,
        }
    }
}

fn provider_attribution(language: ResponseLanguage) -> &'static str {
    match language {
        ResponseLanguage::Chinese => "基于LLM分析的结果",
        ResponseLanguage::English => "Based on LLM analysis",
    }
}

/// Keys of the verdict object the prompt asks for
const VERDICT_FIELDS: [&str; 3] = ["sentiment", "reason", "confidence_score"];

/// JSON object from the bare text, else from a code fence or embedded braces
///
/// Objects pulled out of surrounding text only count when they carry at least
/// one verdict field.
fn extract_object(text: &str) -> Option<Map<String, Value>> {
    if let Some(fields) = as_object(text) {
        return Some(fields);
    }

    [strip_code_fence(text), embedded_braces(text)]
        .into_iter()
        .flatten()
        .filter_map(as_object)
        .find(|fields| VERDICT_FIELDS.iter().any(|key| fields.contains_key(*key)))
}

fn as_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(candidate) {
        Ok(Value::Object(fields)) => Some(fields),
        _ => None,
    }
}

fn strip_code_fence(text: &str) -> Option<&str> {
    let inner = text.strip_prefix("```")?.strip_suffix("```")?;
    // Drop an info string such as "json" on the opening line
    let body = match inner.find('\n') {
        Some(newline) => &inner[newline + 1..],
        None => inner,
    };
    Some(body.trim())
}

fn embedded_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

fn verdict_from_fields(fields: &Map<String, Value>) -> ProviderVerdict {
    let sentiment = fields
        .get("sentiment")
        .and_then(Value::as_str)
        .and_then(Sentiment::from_label)
        .unwrap_or(Sentiment::Neutral);

    let reason = fields
        .get("reason")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);

    let confidence = fields
        .get("confidence_score")
        .and_then(|value| match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        })
        .filter(|c| c.is_finite())
        .map_or(DEFAULT_STRUCTURED_CONFIDENCE, clamp_confidence);

    ProviderVerdict {
        sentiment,
        reason,
        confidence,
    }
}

/// "positive" wins over "negative" when both appear
fn loose_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    if lower.contains("positive") {
        Sentiment::Positive
    } else if lower.contains("negative") {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structured(raw: &str) -> ProviderVerdict {
        match parse_reply(raw) {
            ParseOutcome::Structured(verdict) => verdict,
            other => panic!("expected structured outcome, got {other:?}"),
        }
    }

    #[test]
    fn test_bare_json() {
        let verdict = structured(
            r#"{"sentiment": "Positive", "reason": "新产品发布显示强劲创新力", "confidence_score": 0.85}"#,
        );
        assert_eq!(verdict.sentiment, Sentiment::Positive);
        assert_eq!(verdict.reason.as_deref(), Some("新产品发布显示强劲创新力"));
        assert_eq!(verdict.confidence, 0.85);
    }

    #[test]
    fn test_code_fenced_json() {
        let raw = "```json\n{\"sentiment\": \"Negative\", \"reason\": \"Guidance cut\", \"confidence_score\": 0.6}\n```";
        let verdict = structured(raw);
        assert_eq!(verdict.sentiment, Sentiment::Negative);
        assert_eq!(verdict.confidence, 0.6);
    }

    #[test]
    fn test_json_embedded_in_prose() {
        let raw = "Here is my analysis:\n{\"sentiment\": \"neutral\", \"confidence_score\": \"0.55\"}\nThanks.";
        let verdict = structured(raw);
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert_eq!(verdict.confidence, 0.55);
        assert_eq!(verdict.reason, None);
    }

    #[test]
    fn test_structured_defaults() {
        let verdict = structured(r#"{"sentiment": "Bullish", "reason": "  "}"#);
        assert_eq!(verdict.sentiment, Sentiment::Neutral);
        assert_eq!(verdict.reason, None);
        assert_eq!(verdict.confidence, 0.7);

        let verdict = structured(r#"{"sentiment": "POSITIVE", "confidence_score": "high"}"#);
        assert_eq!(verdict.sentiment, Sentiment::Positive);
        assert_eq!(verdict.confidence, 0.7);
    }

    #[test]
    fn test_structured_confidence_is_clamped() {
        assert_eq!(structured(r#"{"confidence_score": 7}"#).confidence, 1.0);
        assert_eq!(structured(r#"{"confidence_score": -1}"#).confidence, 0.0);
    }

    #[test]
    fn test_structured_result_uses_attribution_when_reason_missing() {
        let result = parse_reply(r#"{"sentiment": "Positive"}"#)
            .into_result("AAPL", ResponseLanguage::Chinese)
            .unwrap();
        assert_eq!(result.reason(), "基于LLM分析的结果");
        assert_eq!(result.confidence_score(), 0.7);

        let result = parse_reply(r#"{"sentiment": "Positive"}"#)
            .into_result("AAPL", ResponseLanguage::English)
            .unwrap();
        assert_eq!(result.reason(), "Based on LLM analysis");
    }

    #[test]
    fn test_loose_text_negative() {
        let raw = "Overall the news flow looks negative for the company.";
        assert_eq!(parse_reply(raw), ParseOutcome::Loose(raw.to_string()));

        let result = parse_reply(raw)
            .into_result("XYZ", ResponseLanguage::English)
            .unwrap();
        assert_eq!(result.sentiment(), Sentiment::Negative);
        assert_eq!(result.confidence_score(), 0.8);
        assert_eq!(result.reason(), raw);
    }

    #[test]
    fn test_loose_text_prefers_positive() {
        assert_eq!(loose_sentiment("Not negative, rather POSITIVE"), Sentiment::Positive);
        assert_eq!(loose_sentiment("无法判断"), Sentiment::Neutral);
    }

    #[test]
    fn test_loose_reason_is_truncated() {
        let raw = "negative ".repeat(40);
        let result = parse_reply(&raw)
            .into_result("XYZ", ResponseLanguage::English)
            .unwrap();
        assert!(result.reason().ends_with("..."));
        assert_eq!(result.reason().chars().count(), 203);
    }

    #[test]
    fn test_embedded_object_without_verdict_fields_is_loose() {
        let raw = "The outlook is negative for the company. Sources: {\"source\": \"newswire\"}";
        assert_eq!(parse_reply(raw), ParseOutcome::Loose(raw.to_string()));

        let result = parse_reply(raw)
            .into_result("XYZ", ResponseLanguage::English)
            .unwrap();
        assert_eq!(result.sentiment(), Sentiment::Negative);
        assert_eq!(result.confidence_score(), 0.8);
        assert_eq!(result.reason(), raw);

        let fenced = "```json\n{\"note\": \"see below\"}\n```\nLooks positive overall.";
        assert!(matches!(parse_reply(fenced), ParseOutcome::Loose(_)));
    }

    #[test]
    fn test_non_object_json_is_loose() {
        assert!(matches!(parse_reply("\"positive\""), ParseOutcome::Loose(_)));
        assert!(matches!(parse_reply("[1, 2]"), ParseOutcome::Loose(_)));
    }

    #[test]
    fn test_empty_reply_fails() {
        assert_eq!(parse_reply(""), ParseOutcome::Failed);
        assert_eq!(parse_reply("  \n "), ParseOutcome::Failed);
        assert!(parse_reply("").into_result("A", ResponseLanguage::Chinese).is_none());
    }
}
