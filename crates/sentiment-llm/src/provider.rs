//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// A provider is created once at startup and shared read-only between
/// requests, so implementations must be `Send + Sync`.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// List the model identifiers the provider exposes
    async fn list_models(&self) -> Result<Vec<String>>;

    /// Get the provider name (e.g., "openai")
    fn name(&self) -> &str;
}
