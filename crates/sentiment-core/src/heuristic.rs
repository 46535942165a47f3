//! Keyword-scoring sentiment classifier
//!
//! The classifier counts financial signal words in each news item. It makes
//! no external calls and always produces a result, which is what makes it a
//! safe fallback for the provider path.

use crate::config::ResponseLanguage;
use crate::model::{AnalysisResult, Sentiment};

/// Signal words that lean positive
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "涨", "上涨", "利好", "买入", "推荐", "增长", "收益", "创新", "突破", "强劲",
];

/// Signal words that lean negative
pub const NEGATIVE_KEYWORDS: &[&str] = &[
    "跌", "下跌", "利空", "卖出", "警告", "亏损", "风险", "危机", "衰退", "疲软",
];

// Confidence is tracked in tenths so the scores come out exact.
const BASE_TENTHS: usize = 6;
const CEILING_TENTHS: usize = 9;
const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// Positive and negative signal counts over a set of news items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignalCounts {
    /// Positive keyword occurrences
    pub positive: usize,
    /// Negative keyword occurrences
    pub negative: usize,
}

impl SignalCounts {
    /// Net score: positive minus negative
    pub fn score(&self) -> i64 {
        self.positive as i64 - self.negative as i64
    }
}

/// A keyword set matched longest-first without overlap
#[derive(Debug, Clone)]
struct KeywordSet {
    words: Vec<String>,
}

impl KeywordSet {
    fn new<S: AsRef<str>>(words: &[S]) -> Self {
        let mut words: Vec<String> = words
            .iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        words.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        words.dedup();
        Self { words }
    }

    /// Count non-overlapping occurrences in already lower-cased `text`
    ///
    /// At each position the longest matching keyword wins, so "上涨" is a
    /// single hit rather than a hit for both "上涨" and "涨".
    fn count_in(&self, text: &str) -> usize {
        let mut count = 0;
        let mut rest = text;

        while let Some(ch) = rest.chars().next() {
            match self.words.iter().find(|w| rest.starts_with(w.as_str())) {
                Some(word) => {
                    count += 1;
                    rest = &rest[word.len()..];
                }
                None => rest = &rest[ch.len_utf8()..],
            }
        }

        count
    }
}

/// Deterministic keyword-counting classifier
#[derive(Debug, Clone)]
pub struct HeuristicClassifier {
    positive: KeywordSet,
    negative: KeywordSet,
    language: ResponseLanguage,
}

impl Default for HeuristicClassifier {
    fn default() -> Self {
        Self::new(ResponseLanguage::default())
    }
}

impl HeuristicClassifier {
    /// Classifier with the built-in keyword sets
    pub fn new(language: ResponseLanguage) -> Self {
        Self::with_keywords(POSITIVE_KEYWORDS, NEGATIVE_KEYWORDS, language)
    }

    /// Classifier with custom keyword sets
    pub fn with_keywords<S: AsRef<str>>(
        positive: &[S],
        negative: &[S],
        language: ResponseLanguage,
    ) -> Self {
        Self {
            positive: KeywordSet::new(positive),
            negative: KeywordSet::new(negative),
            language,
        }
    }

    /// Count signal words across all items
    pub fn count_signals(&self, texts: &[String]) -> SignalCounts {
        texts
            .iter()
            .map(|text| text.to_lowercase())
            .fold(SignalCounts::default(), |acc, text| SignalCounts {
                positive: acc.positive + self.positive.count_in(&text),
                negative: acc.negative + self.negative.count_in(&text),
            })
    }

    /// Classify the news items for `symbol`
    pub fn classify(&self, symbol: &str, texts: &[String]) -> AnalysisResult {
        let counts = self.count_signals(texts);

        let (sentiment, confidence, reason) = match counts.score() {
            s if s > 0 => (
                Sentiment::Positive,
                signal_confidence(counts.positive),
                self.signal_reason(Sentiment::Positive, counts.positive),
            ),
            s if s < 0 => (
                Sentiment::Negative,
                signal_confidence(counts.negative),
                self.signal_reason(Sentiment::Negative, counts.negative),
            ),
            _ => (
                Sentiment::Neutral,
                NEUTRAL_CONFIDENCE,
                self.neutral_reason().to_string(),
            ),
        };

        tracing::debug!(
            symbol,
            positive = counts.positive,
            negative = counts.negative,
            %sentiment,
            "keyword heuristic classified news"
        );

        AnalysisResult::new(symbol, sentiment, reason, confidence)
    }

    fn signal_reason(&self, sentiment: Sentiment, count: usize) -> String {
        match (self.language, sentiment) {
            (ResponseLanguage::Chinese, Sentiment::Positive) => {
                format!("基于{count}个正面信号的分析结果")
            }
            (ResponseLanguage::Chinese, _) => format!("基于{count}个负面信号的分析结果"),
            (ResponseLanguage::English, Sentiment::Positive) => {
                format!("Based on {count} positive signal(s) found in the news")
            }
            (ResponseLanguage::English, _) => {
                format!("Based on {count} negative signal(s) found in the news")
            }
        }
    }

    fn neutral_reason(&self) -> &'static str {
        match self.language {
            ResponseLanguage::Chinese => "未发现明确的正面或负面信号",
            ResponseLanguage::English => "No clear positive or negative signal found",
        }
    }
}

/// `min(0.9, 0.6 + count * 0.1)`
fn signal_confidence(count: usize) -> f64 {
    (BASE_TENTHS + count).min(CEILING_TENTHS) as f64 / 10.0
}
