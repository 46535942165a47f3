//! Error types for sentiment analysis

use sentiment_llm::LLMError;
use std::time::Duration;
use thiserror::Error;

/// Errors a caller of the sentiment pipeline can observe
#[derive(Debug, Error)]
pub enum SentimentError {
    /// Request failed validation before any classification was attempted
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration is missing or malformed
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Prompt templates failed to load
    #[error("Prompt template error: {0}")]
    PromptError(#[from] minijinja::Error),
}

/// Result type alias for sentiment operations
pub type Result<T> = std::result::Result<T, SentimentError>;

/// Reasons the provider path was abandoned
///
/// These never reach callers of [`crate::SentimentAnalyzer::classify`]; they
/// are logged and the keyword heuristic answers instead.
#[derive(Debug, Error)]
pub enum ProviderFailure {
    /// The provider call itself failed
    #[error("provider call failed: {0}")]
    Call(#[from] LLMError),

    /// The provider did not answer within the configured bound
    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),

    /// The user prompt could not be rendered
    #[error("prompt rendering failed: {0}")]
    Prompt(String),

    /// The provider answered with nothing usable
    #[error("provider returned an empty reply")]
    EmptyReply,
}
