// ABOUTME: Environment-based configuration for provider selection, credentials, and deadlines
// ABOUTME: Values are read once at startup into immutable structs passed by reference
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Environment Configuration
//!
//! Configuration comes exclusively from environment variables. Malformed
//! numeric values fall back to their defaults with a warning. A missing API
//! key is not an error here: the affected adapter reports a configuration
//! failure per request instead, so the process always starts.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use mindwell_core::constants::timeouts;
use mindwell_core::errors::{AppError, AppResult};
use tracing::{info, warn};

use super::types::{Environment, LlmProviderType};

/// Default Ollama endpoint
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";
/// Default Gemini endpoint
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default Anthropic endpoint
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
/// Default `OpenAI` endpoint
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
/// Default completion length; replies are one or two sentences
pub const DEFAULT_MAX_TOKENS: u32 = 150;

/// Environment variable for sampling temperature
pub const TEMPERATURE_ENV_VAR: &str = "MINDWELL_LLM_TEMPERATURE";
/// Environment variable for completion length
pub const MAX_TOKENS_ENV_VAR: &str = "MINDWELL_LLM_MAX_TOKENS";
/// Environment variable for the generation deadline in seconds
pub const TIMEOUT_ENV_VAR: &str = "MINDWELL_LLM_TIMEOUT_SECS";
/// Environment variable toggling the startup readiness probe
pub const STARTUP_PROBE_ENV_VAR: &str = "MINDWELL_STARTUP_PROBE";

/// Where one provider lives and how to authenticate with it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    /// Base URL without trailing slash
    pub base_url: String,
    /// API key, when the provider needs one
    pub api_key: Option<String>,
}

impl ProviderEndpoint {
    /// Endpoint without credential
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: None,
        }
    }

    /// Attach a credential
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    fn from_env(url_var: &str, default_url: &str, key_var: Option<&str>) -> Self {
        let base_url = env::var(url_var)
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| default_url.to_owned());
        let api_key = key_var
            .and_then(|var| env::var(var).ok())
            .filter(|key| !key.trim().is_empty());

        Self {
            api_key,
            ..Self::new(base_url)
        }
    }
}

/// Generation settings shared by every adapter; immutable after startup
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Provider the router dispatches to
    pub provider: LlmProviderType,
    /// Requested model id; adapters substitute their default when it does not fit
    pub model: Option<String>,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Deadline for a generation call
    pub generation_timeout: Duration,
    /// Deadline for a liveness probe
    pub liveness_timeout: Duration,
    /// Backend A
    pub ollama: ProviderEndpoint,
    /// Backend B
    pub gemini: ProviderEndpoint,
    /// Backend C
    pub anthropic: ProviderEndpoint,
    /// Backend D
    pub openai: ProviderEndpoint,
}

impl ProviderConfig {
    /// Defaults for the given provider with public endpoints and no credentials
    #[must_use]
    pub fn new(provider: LlmProviderType) -> Self {
        Self {
            provider,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            generation_timeout: Duration::from_secs(timeouts::GENERATION_SECS),
            liveness_timeout: Duration::from_secs(timeouts::LIVENESS_SECS),
            ollama: ProviderEndpoint::new(DEFAULT_OLLAMA_BASE_URL),
            gemini: ProviderEndpoint::new(DEFAULT_GEMINI_BASE_URL),
            anthropic: ProviderEndpoint::new(DEFAULT_ANTHROPIC_BASE_URL),
            openai: ProviderEndpoint::new(DEFAULT_OPENAI_BASE_URL),
        }
    }

    /// Load from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let provider = LlmProviderType::from_env();
        let model = env::var(LlmProviderType::MODEL_ENV_VAR)
            .ok()
            .filter(|model| !model.trim().is_empty());

        Self {
            provider,
            model,
            temperature: parse_or_default(TEMPERATURE_ENV_VAR, DEFAULT_TEMPERATURE),
            max_tokens: parse_or_default(MAX_TOKENS_ENV_VAR, DEFAULT_MAX_TOKENS),
            generation_timeout: Duration::from_secs(parse_or_default(
                TIMEOUT_ENV_VAR,
                timeouts::GENERATION_SECS,
            )),
            liveness_timeout: Duration::from_secs(timeouts::LIVENESS_SECS),
            ollama: ProviderEndpoint::from_env("OLLAMA_BASE_URL", DEFAULT_OLLAMA_BASE_URL, None),
            gemini: ProviderEndpoint::from_env(
                "GEMINI_BASE_URL",
                DEFAULT_GEMINI_BASE_URL,
                Some("GEMINI_API_KEY"),
            ),
            anthropic: ProviderEndpoint::from_env(
                "ANTHROPIC_BASE_URL",
                DEFAULT_ANTHROPIC_BASE_URL,
                Some("ANTHROPIC_API_KEY"),
            ),
            openai: ProviderEndpoint::from_env(
                "OPENAI_BASE_URL",
                DEFAULT_OPENAI_BASE_URL,
                Some("OPENAI_API_KEY"),
            ),
        }
    }

    /// Set the requested model
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Replace one provider's endpoint
    #[must_use]
    pub fn with_endpoint(mut self, provider: LlmProviderType, endpoint: ProviderEndpoint) -> Self {
        match provider {
            LlmProviderType::Ollama => self.ollama = endpoint,
            LlmProviderType::Gemini => self.gemini = endpoint,
            LlmProviderType::Anthropic => self.anthropic = endpoint,
            LlmProviderType::OpenAi => self.openai = endpoint,
        }
        self
    }

    /// Set the generation deadline
    #[must_use]
    pub const fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Set the liveness deadline
    #[must_use]
    pub const fn with_liveness_timeout(mut self, timeout: Duration) -> Self {
        self.liveness_timeout = timeout;
        self
    }

    /// Endpoint of the given provider
    #[must_use]
    pub const fn endpoint(&self, provider: LlmProviderType) -> &ProviderEndpoint {
        match provider {
            LlmProviderType::Ollama => &self.ollama,
            LlmProviderType::Gemini => &self.gemini,
            LlmProviderType::Anthropic => &self.anthropic,
            LlmProviderType::OpenAi => &self.openai,
        }
    }

    /// Validate value ranges
    ///
    /// # Errors
    ///
    /// Returns a configuration error when temperature, token count, or
    /// deadline is out of range.
    pub fn validate(&self) -> AppResult<()> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::config(format!(
                "{TEMPERATURE_ENV_VAR} must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(AppError::config(format!(
                "{MAX_TOKENS_ENV_VAR} must be greater than zero"
            )));
        }
        if self.generation_timeout.is_zero() {
            return Err(AppError::config(format!(
                "{TIMEOUT_ENV_VAR} must be greater than zero"
            )));
        }
        Ok(())
    }
}

/// Process-wide settings assembled at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Text-generation settings
    pub provider: ProviderConfig,
    /// Whether to run the background readiness probe
    pub startup_probe: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a value is out of range.
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let config = Self {
            environment: Environment::from_env(),
            provider: ProviderConfig::from_env(),
            startup_probe: env::var(STARTUP_PROBE_ENV_VAR)
                .map(|v| !(v.eq_ignore_ascii_case("false") || v == "0"))
                .unwrap_or(true),
        };

        config.provider.validate()?;
        if config.provider.provider.requires_api_key()
            && config
                .provider
                .endpoint(config.provider.provider)
                .api_key
                .is_none()
        {
            warn!(
                provider = %config.provider.provider,
                "Selected provider has no API key; generation will report a configuration error"
            );
        }

        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        let endpoint = self.provider.endpoint(self.provider.provider);
        format!(
            "Mindwell Configuration:\n\
             - Environment: {}\n\
             - Provider: {}\n\
             - Model: {}\n\
             - Endpoint: {}\n\
             - Credential: {}\n\
             - Generation Timeout: {}s\n\
             - Startup Probe: {}",
            self.environment,
            self.provider.provider,
            self.provider.model.as_deref().unwrap_or("(provider default)"),
            endpoint.base_url,
            if endpoint.api_key.is_some() {
                "configured"
            } else {
                "none"
            },
            self.provider.generation_timeout.as_secs(),
            self.startup_probe,
        )
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {key} value '{raw}', using default {default}");
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let endpoint = ProviderEndpoint::new("http://localhost:11434/");
        assert_eq!(endpoint.base_url, "http://localhost:11434");
    }

    #[test]
    fn test_validate_rejects_temperature_out_of_range() {
        let mut config = ProviderConfig::new(LlmProviderType::Ollama);
        assert!(config.validate().is_ok());

        config.temperature = 3.5;
        let error = config.validate().unwrap_err();
        assert!(error.message.contains(TEMPERATURE_ENV_VAR));
    }

    #[test]
    fn test_summary_hides_credentials() {
        let config = ServerConfig {
            environment: Environment::Testing,
            provider: ProviderConfig::new(LlmProviderType::OpenAi).with_endpoint(
                LlmProviderType::OpenAi,
                ProviderEndpoint::new(DEFAULT_OPENAI_BASE_URL).with_api_key("sk-secret-value-1234567"),
            ),
            startup_probe: false,
        };

        let summary = config.summary();
        assert!(summary.contains("Credential: configured"));
        assert!(!summary.contains("sk-secret"));
    }
}
