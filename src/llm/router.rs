// ABOUTME: Routes generation requests to the configured adapter and normalizes every outcome
// ABOUTME: Applies the system prompt, context window, and deadline, and maps failures to safe fallbacks
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Provider Router
//!
//! [`ProviderRouter::generate`] never returns an error. Whatever goes wrong
//! inside an adapter ends up as a [`GenerationResult`] with `success = false`,
//! the failure kind, and a fixed message that is safe to show the user.

use std::time::Instant;

use mindwell_core::constants::{messages, windows};
use mindwell_core::errors::ErrorKind;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::prompts::get_companion_system_prompt;
use super::{ChatMessage, ChatRequest, LlmProvider, LlmProviderRegistry};
use crate::config::ProviderConfig;
use crate::errors::{AppError, AppResult};
use crate::logging::{preview, AppLogger};

// ============================================================================
// Generation Result
// ============================================================================

/// Outcome of one generation call
///
/// Success always carries the reply text; failure always carries the kind
/// and a fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    success: bool,
    text: String,
    model_used: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_kind: Option<ErrorKind>,
}

impl GenerationResult {
    /// Successful generation
    #[must_use]
    pub fn succeeded(text: impl Into<String>, model_used: impl Into<String>) -> Self {
        Self {
            success: true,
            text: text.into(),
            model_used: model_used.into(),
            error_kind: None,
        }
    }

    /// Failed generation carrying the fallback text for its kind
    #[must_use]
    pub fn failed(kind: ErrorKind, model_used: impl Into<String>) -> Self {
        Self {
            success: false,
            text: fallback_message(kind).to_owned(),
            model_used: model_used.into(),
            error_kind: Some(kind),
        }
    }

    /// Whether the provider produced a reply
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Reply text, or the fallback text on failure
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Model the request was sent to
    #[must_use]
    pub fn model_used(&self) -> &str {
        &self.model_used
    }

    /// Failure kind, present exactly when `success` is false
    #[must_use]
    pub const fn error_kind(&self) -> Option<ErrorKind> {
        self.error_kind
    }

    /// Consume the result, keeping the text
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Fixed user-facing text for a failure kind
#[must_use]
pub const fn fallback_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Timeout => messages::FALLBACK_TIMEOUT,
        ErrorKind::Connection => messages::FALLBACK_CONNECTION,
        ErrorKind::Provider => messages::FALLBACK_PROVIDER,
        ErrorKind::Config
        | ErrorKind::Parse
        | ErrorKind::Validation
        | ErrorKind::Internal => messages::FALLBACK_GENERIC,
    }
}

// ============================================================================
// Message Assembly
// ============================================================================

/// Last messages of the context that are forwarded, in original order
#[must_use]
pub fn context_window(context: &[ChatMessage]) -> &[ChatMessage] {
    let start = context.len().saturating_sub(windows::CONTEXT_MESSAGES);
    &context[start..]
}

/// System prompt, then the context window, then the new user message
#[must_use]
pub fn build_messages(message: &str, context: &[ChatMessage]) -> Vec<ChatMessage> {
    let window = context_window(context);
    let mut messages = Vec::with_capacity(window.len() + 2);
    messages.push(ChatMessage::system(get_companion_system_prompt()));
    messages.extend_from_slice(window);
    messages.push(ChatMessage::user(message));
    messages
}

// ============================================================================
// Router
// ============================================================================

/// Dispatches to the configured provider by name
pub struct ProviderRouter {
    registry: LlmProviderRegistry,
    config: ProviderConfig,
}

impl ProviderRouter {
    /// Router over the standard adapters
    ///
    /// # Errors
    ///
    /// Returns an error if an adapter's HTTP client cannot be created.
    pub fn from_config(config: ProviderConfig) -> AppResult<Self> {
        let registry = LlmProviderRegistry::from_config(&config)?;
        info!(
            provider = %config.provider,
            model = config.model.as_deref().unwrap_or("(provider default)"),
            "LLM router initialized"
        );
        Ok(Self { registry, config })
    }

    /// Router over a caller-supplied registry
    #[must_use]
    pub const fn with_registry(config: ProviderConfig, registry: LlmProviderRegistry) -> Self {
        Self { registry, config }
    }

    /// Settings the router was built with
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Adapter serving the configured provider
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no adapter is registered under that name.
    pub fn provider(&self) -> AppResult<&dyn LlmProvider> {
        self.registry.require(self.config.provider.as_str())
    }

    /// Model the configured provider will be asked for
    #[must_use]
    pub fn resolved_model(&self) -> String {
        self.provider().map_or_else(
            |_| self.config.model.clone().unwrap_or_default(),
            |provider| provider.resolve_model(self.config.model.as_deref()),
        )
    }

    /// Generate a reply to `message` given earlier conversation turns
    pub async fn generate(&self, message: &str, context: &[ChatMessage]) -> GenerationResult {
        let started = Instant::now();
        let provider_name = self.config.provider.as_str();

        let provider = match self.provider() {
            Ok(provider) => provider,
            Err(error) => {
                warn!(provider = provider_name, error = %error, "No adapter for configured provider");
                return GenerationResult::failed(error.kind(), self.resolved_model());
            }
        };

        let model = provider.resolve_model(self.config.model.as_deref());
        let request = ChatRequest::new(build_messages(message, context))
            .with_model(model.clone())
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens);

        debug!(
            provider = provider_name,
            message = %preview(message),
            context = context_window(context).len(),
            "Dispatching generation"
        );

        let deadline = self.config.generation_timeout;
        let outcome = match timeout(deadline, provider.complete(&request)).await {
            Ok(Ok(response)) if response.content.trim().is_empty() => Err(AppError::parse_failure(
                provider.display_name(),
                "Response contained no reply text",
            )),
            Ok(result) => result,
            Err(_) => Err(AppError::timeout(provider.display_name(), deadline.as_secs())),
        };

        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        match outcome {
            Ok(response) => {
                AppLogger::log_generation(provider_name, &response.model, duration_ms, None);
                GenerationResult::succeeded(response.content, response.model)
            }
            Err(error) => {
                warn!(provider = provider_name, error = %error, "Generation failed");
                AppLogger::log_generation(provider_name, &model, duration_ms, Some(error.kind()));
                GenerationResult::failed(error.kind(), model)
            }
        }
    }

    /// Whether the configured provider looks ready
    ///
    /// For credential-based providers this is only a key-shape check.
    pub async fn is_available(&self) -> bool {
        match self.provider() {
            Ok(provider) => provider.is_available().await,
            Err(_) => false,
        }
    }
}
