//! News sentiment inference pipeline
//!
//! Given a stock symbol and a handful of news snippets, this crate produces a
//! [`Sentiment`] call with a short rationale and a confidence score.
//!
//! Classification is two-tiered:
//!
//! - [`SentimentAnalyzer`] asks an LLM provider for a JSON verdict and parses
//!   the reply, tolerating code fences and free-form prose.
//! - [`HeuristicClassifier`] counts financial signal words and always
//!   produces an answer. It is used whenever no provider is configured or the
//!   provider path fails for any reason.
//!
//! # Example
//!
//! ```no_run
//! use sentiment_core::{SentimentAnalyzer, SentimentConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SentimentConfig::from_env()?;
//!     let analyzer = SentimentAnalyzer::from_config(&config)?;
//!
//!     let news = vec!["苹果发布新iPhone".to_string(), "科技股上涨".to_string()];
//!     let result = analyzer.classify("AAPL", &news).await?;
//!     println!("{} {} ({:.2})", result.symbol(), result.sentiment(), result.confidence_score());
//!     Ok(())
//! }
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod heuristic;
pub mod model;
pub mod parse;
pub mod prompts;

pub use analyzer::{ProviderHandle, SentimentAnalyzer, init_provider};
pub use config::{ResponseLanguage, SentimentConfig};
pub use error::{ProviderFailure, Result, SentimentError};
pub use heuristic::{HeuristicClassifier, SignalCounts};
pub use model::{AnalysisRequest, AnalysisResult, Sentiment};
pub use parse::{ParseOutcome, ProviderVerdict, parse_reply};
