//! Provider-first sentiment analysis with heuristic fallback

use crate::config::{ResponseLanguage, SentimentConfig};
use crate::error::{ProviderFailure, Result};
use crate::heuristic::HeuristicClassifier;
use crate::model::{AnalysisRequest, AnalysisResult};
use crate::parse::parse_reply;
use crate::prompts::NewsPrompt;
use sentiment_llm::providers::{OpenAIConfig, OpenAIProvider};
use sentiment_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Shared, read-only handle to the LLM provider
pub type ProviderHandle = Arc<dyn LLMProvider>;

/// Build the provider handle from configuration
///
/// Returns `None` when no usable credential is configured or the client
/// cannot be constructed; the service then runs on the keyword heuristic.
pub fn init_provider(config: &SentimentConfig) -> Option<ProviderHandle> {
    let Some(api_key) = config.credential() else {
        warn!("OPENAI_API_KEY not set, using keyword heuristic only");
        return None;
    };

    let openai_config = OpenAIConfig::new(api_key)
        .with_api_base(config.api_base.clone())
        .with_timeout(config.provider_timeout.as_secs().max(1));

    match OpenAIProvider::with_config(openai_config) {
        Ok(provider) => {
            info!(api_base = %config.api_base, model = %config.model, "LLM provider initialized");
            Some(Arc::new(provider))
        }
        Err(e) => {
            warn!(error = %e, "LLM provider initialization failed, using keyword heuristic only");
            None
        }
    }
}

/// Sentiment analyzer that consults an LLM and falls back to keyword scoring
///
/// Every provider-side failure (missing provider, transport error, timeout,
/// empty reply) is absorbed here. The only error [`Self::classify`] returns
/// is request validation.
pub struct SentimentAnalyzer {
    provider: Option<ProviderHandle>,
    heuristic: HeuristicClassifier,
    prompt: NewsPrompt,
    model: String,
    max_tokens: usize,
    temperature: f32,
    timeout: Duration,
}

impl SentimentAnalyzer {
    /// Create an analyzer with an explicit provider handle
    pub fn new(config: &SentimentConfig, provider: Option<ProviderHandle>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            heuristic: HeuristicClassifier::new(config.response_language),
            prompt: NewsPrompt::new(config.response_language)?,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout: config.provider_timeout,
        })
    }

    /// Create an analyzer, building the provider from configuration
    pub fn from_config(config: &SentimentConfig) -> Result<Self> {
        Self::new(config, init_provider(config))
    }

    /// Whether a provider is configured
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// The configured provider, if any
    pub fn provider(&self) -> Option<&ProviderHandle> {
        self.provider.as_ref()
    }

    /// Model identifier sent to the provider
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Language used for prompts and reasons
    pub fn language(&self) -> ResponseLanguage {
        self.prompt.language()
    }

    /// The fallback classifier
    pub fn heuristic(&self) -> &HeuristicClassifier {
        &self.heuristic
    }

    /// Validate the input and classify it
    pub async fn classify(&self, symbol: &str, texts: &[String]) -> Result<AnalysisResult> {
        let request = AnalysisRequest::new(symbol, texts.to_vec())?;
        Ok(self.analyze(&request).await)
    }

    /// Classify an already validated request
    pub async fn analyze(&self, request: &AnalysisRequest) -> AnalysisResult {
        let Some(provider) = &self.provider else {
            debug!(symbol = request.symbol(), "no provider configured, using keyword heuristic");
            return self.heuristic.classify(request.symbol(), request.texts());
        };

        match self.consult_provider(provider.as_ref(), request).await {
            Ok(result) => result,
            Err(failure) => {
                warn!(
                    symbol = request.symbol(),
                    provider = provider.name(),
                    error = %failure,
                    "LLM analysis failed, falling back to keyword heuristic"
                );
                self.heuristic.classify(request.symbol(), request.texts())
            }
        }
    }

    #[instrument(skip_all, fields(symbol = request.symbol(), model = %self.model))]
    async fn consult_provider(
        &self,
        provider: &dyn LLMProvider,
        request: &AnalysisRequest,
    ) -> std::result::Result<AnalysisResult, ProviderFailure> {
        let user_prompt = self
            .prompt
            .render_user(request.symbol(), request.texts())
            .map_err(|e| ProviderFailure::Prompt(e.to_string()))?;

        let completion = CompletionRequest::builder(&self.model)
            .system(self.prompt.system())
            .add_message(Message::user(user_prompt))
            .max_tokens(self.max_tokens)
            .temperature(self.temperature)
            .build();

        let response = tokio::time::timeout(self.timeout, provider.complete(completion))
            .await
            .map_err(|_| ProviderFailure::Timeout(self.timeout))??;

        debug!(
            symbol = request.symbol(),
            output_tokens = response.usage.output_tokens,
            "provider replied"
        );

        parse_reply(response.text())
            .into_result(request.symbol(), self.prompt.language())
            .ok_or(ProviderFailure::EmptyReply)
    }
}

impl std::fmt::Debug for SentimentAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAnalyzer")
            .field("provider", &self.provider.as_ref().map(|p| p.name().to_string()))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
