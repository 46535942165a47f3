//! Configuration for the sentiment pipeline

use crate::error::{Result, SentimentError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Placeholder shipped in sample `.env` files; treated as "no key"
const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Language used for prompts and heuristic reasons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResponseLanguage {
    /// Simplified Chinese
    #[default]
    Chinese,
    /// English
    English,
}

impl FromStr for ResponseLanguage {
    type Err = SentimentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "zh" | "chinese" | "中文" | "zh-cn" | "zh-hans" => Ok(ResponseLanguage::Chinese),
            "en" | "english" => Ok(ResponseLanguage::English),
            other => Err(SentimentError::ConfigError(format!(
                "unsupported response language '{other}'"
            ))),
        }
    }
}

/// Configuration for sentiment inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// Provider credential; `None` disables the provider path
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    pub api_base: String,

    /// Model identifier sent with every completion
    pub model: String,

    /// Upper bound on generated tokens
    pub max_tokens: usize,

    /// Sampling temperature
    pub temperature: f32,

    /// How long to wait for the provider before falling back
    pub provider_timeout: Duration,

    /// Language for prompts and fallback reasons
    pub response_language: ResponseLanguage,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            provider_timeout: Duration::from_secs(30),
            response_language: ResponseLanguage::Chinese,
        }
    }
}

impl SentimentConfig {
    /// Create a new configuration builder
    pub fn builder() -> SentimentConfigBuilder {
        SentimentConfigBuilder::default()
    }

    /// Defaults overlaid with environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }

    /// Usable provider credential, if any
    ///
    /// Empty keys and the sample placeholder count as absent.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(SentimentError::ConfigError(
                "model must not be empty".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(SentimentError::ConfigError(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(SentimentError::ConfigError(format!(
                "temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }

        if self.provider_timeout.is_zero() {
            return Err(SentimentError::ConfigError(
                "provider_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for SentimentConfig
#[derive(Debug, Default)]
pub struct SentimentConfigBuilder {
    api_key: Option<String>,
    api_base: Option<String>,
    model: Option<String>,
    max_tokens: Option<usize>,
    temperature: Option<f32>,
    provider_timeout: Option<Duration>,
    response_language: Option<ResponseLanguage>,
}

impl SentimentConfigBuilder {
    /// Set the provider API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the provider base URL
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the generated token limit
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the provider timeout
    pub fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = Some(timeout);
        self
    }

    /// Set the response language
    pub fn response_language(mut self, language: ResponseLanguage) -> Self {
        self.response_language = Some(language);
        self
    }

    /// Overlay values from environment variables
    ///
    /// Reads `OPENAI_API_KEY`, `OPENAI_API_BASE`, `DEFAULT_MODEL`,
    /// `MAX_TOKENS`, `TEMPERATURE`, `PROVIDER_TIMEOUT_SECS` and
    /// `RESPONSE_LANGUAGE`. Unset variables leave the builder untouched.
    pub fn with_env(mut self) -> Result<Self> {
        if let Some(key) = env_var("OPENAI_API_KEY") {
            self.api_key = Some(key);
        }
        if let Some(base) = env_var("OPENAI_API_BASE") {
            self.api_base = Some(base);
        }
        if let Some(model) = env_var("DEFAULT_MODEL") {
            self.model = Some(model);
        }
        if let Some(max_tokens) = env_parse("MAX_TOKENS")? {
            self.max_tokens = Some(max_tokens);
        }
        if let Some(temperature) = env_parse("TEMPERATURE")? {
            self.temperature = Some(temperature);
        }
        if let Some(secs) = env_parse::<u64>("PROVIDER_TIMEOUT_SECS")? {
            self.provider_timeout = Some(Duration::from_secs(secs));
        }
        if let Some(language) = env_var("RESPONSE_LANGUAGE") {
            self.response_language = Some(language.parse()?);
        }
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<SentimentConfig> {
        let defaults = SentimentConfig::default();

        let config = SentimentConfig {
            api_key: self.api_key,
            api_base: self.api_base.unwrap_or(defaults.api_base),
            model: self.model.unwrap_or(defaults.model),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            provider_timeout: self.provider_timeout.unwrap_or(defaults.provider_timeout),
            response_language: self.response_language.unwrap_or(defaults.response_language),
        };

        config.validate()?;
        Ok(config)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: FromStr>(name: &str) -> Result<Option<T>> {
    env_var(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|_| {
                SentimentError::ConfigError(format!("{name} has an invalid value '{raw}'"))
            })
        })
        .transpose()
}
