// ABOUTME: Text-generation provider abstraction over several heterogeneous backends
// ABOUTME: Defines canonical messages, the LlmProvider contract, and the registry keyed by provider name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # LLM Provider Service Provider Interface
//!
//! Every backend is an interchangeable adapter implementing [`LlmProvider`].
//! Adapters translate the canonical [`ChatRequest`] into their own wire
//! format, call the backend, pull the reply text out of the response, and
//! map every failure onto an [`AppError`] whose [`ErrorKind`] the router
//! turns into a user-safe fallback.
//!
//! ## Key Concepts
//!
//! - **`LlmCapabilities`**: Bitflags describing how a backend takes its prompt and credential
//! - **`LlmProvider`**: Async trait for one-shot chat completion plus a readiness check
//! - **`LlmProviderRegistry`**: Adapters keyed by name; the router never branches on provider
//!
//! ## Example: Using the router
//!
//! ```rust,no_run
//! use mindwell_server::config::{LlmProviderType, ProviderConfig};
//! use mindwell_server::llm::ProviderRouter;
//!
//! async fn example() {
//!     let config = ProviderConfig::new(LlmProviderType::Ollama);
//!     if let Ok(router) = ProviderRouter::from_config(config) {
//!         let result = router.generate("I had a rough day", &[]).await;
//!         println!("{}", result.text());
//!     }
//! }
//! ```
//!
//! [`ErrorKind`]: mindwell_core::errors::ErrorKind

mod anthropic;
mod gemini;
mod ollama;
mod openai;
pub mod prompts;
pub mod readiness;
mod router;
mod transport;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use prompts::get_companion_system_prompt;
pub use readiness::{spawn_startup_probe, ProviderReadinessProbe, ReadinessProbe};
pub use router::{GenerationResult, ProviderRouter};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ProviderConfig;
use crate::errors::{AppError, AppResult};

// ============================================================================
// Capability Flags
// ============================================================================

bitflags::bitflags! {
    /// How a backend expects its prompt and credential
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct LlmCapabilities: u8 {
        /// System prompt travels as a message in the role-tagged array
        const SYSTEM_MESSAGES = 0b0000_0001;
        /// System prompt travels as a dedicated request parameter
        const SYSTEM_PARAMETER = 0b0000_0010;
        /// Conversation is flattened into one role-prefixed prompt string
        const FLATTENED_PROMPT = 0b0000_0100;
        /// Requests authenticate with an API key
        const API_KEY = 0b0000_1000;
        /// Backend runs on the local machine
        const LOCAL = 0b0001_0000;
    }
}

impl LlmCapabilities {
    /// Check if the backend needs a credential
    #[must_use]
    pub const fn requires_api_key(&self) -> bool {
        self.contains(Self::API_KEY)
    }

    /// Check if the backend is locally hosted
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.contains(Self::LOCAL)
    }
}

// ============================================================================
// Message Types
// ============================================================================

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instruction message
    System,
    /// User input message
    User,
    /// Assistant response message
    Assistant,
}

impl MessageRole {
    /// Convert to string representation for API calls
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    /// Label used when a conversation is flattened into one prompt
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::System => "System",
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// A single message in a chat conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a system message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Configuration for a chat completion request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Conversation messages, system prompt first
    pub messages: Vec<ChatMessage>,
    /// Model identifier (provider-specific)
    pub model: Option<String>,
    /// Temperature for response randomness (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new chat request with messages
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the model to use
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum tokens
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// System prompt, when the first message carries one
    #[must_use]
    pub fn system_prompt(&self) -> Option<&str> {
        self.messages
            .first()
            .filter(|msg| msg.role == MessageRole::System)
            .map(|msg| msg.content.as_str())
    }

    /// Messages after the system prompt
    #[must_use]
    pub fn conversation(&self) -> &[ChatMessage] {
        match self.messages.split_first() {
            Some((first, rest)) if first.role == MessageRole::System => rest,
            _ => &self.messages,
        }
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated message content
    pub content: String,
    /// Model used for generation
    pub model: String,
}

// ============================================================================
// Provider Trait
// ============================================================================

/// LLM provider trait for chat completion
///
/// Implement this trait to add a backend. Adapters must not panic and must
/// not let a transport error escape unmapped: every failure is an
/// [`AppError`] whose code identifies the failure kind.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Unique provider identifier (e.g., "ollama", "gemini")
    fn name(&self) -> &'static str;

    /// Human-readable display name for the provider
    fn display_name(&self) -> &'static str;

    /// How the backend takes its prompt and credential
    fn capabilities(&self) -> LlmCapabilities;

    /// Known-good model used when the configured one does not fit
    fn default_model(&self) -> &'static str;

    /// Whether a model id follows this provider's naming convention
    fn matches_model(&self, model: &str) -> bool;

    /// Model to request given the configured one
    ///
    /// Substitutes [`LlmProvider::default_model`] rather than failing when the
    /// configured id is absent or belongs to another provider.
    fn resolve_model(&self, configured: Option<&str>) -> String {
        match configured.map(str::trim).filter(|model| !model.is_empty()) {
            Some(model) if self.matches_model(model) => model.to_owned(),
            Some(model) => {
                debug!(
                    provider = self.name(),
                    requested = model,
                    fallback = self.default_model(),
                    "Model does not match provider naming; using default"
                );
                self.default_model().to_owned()
            }
            None => self.default_model().to_owned(),
        }
    }

    /// Perform a chat completion
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse>;

    /// Whether the provider looks ready to serve
    ///
    /// Local backends are probed over the network. Credential backends only
    /// check the configured key's shape, which does not prove reachability.
    async fn is_available(&self) -> bool;
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Registry for LLM providers
///
/// Manages available providers and provides lookup by name.
pub struct LlmProviderRegistry {
    providers: Vec<Box<dyn LlmProvider>>,
}

impl LlmProviderRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry holding one adapter per supported backend
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be created.
    pub fn from_config(config: &ProviderConfig) -> AppResult<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(OllamaProvider::new(config)?));
        registry.register(Box::new(GeminiProvider::new(config)?));
        registry.register(Box::new(AnthropicProvider::new(config)?));
        registry.register(Box::new(OpenAiProvider::new(config)?));
        Ok(registry)
    }

    /// Register a provider, replacing any with the same name
    pub fn register(&mut self, provider: Box<dyn LlmProvider>) {
        self.providers.retain(|p| p.name() != provider.name());
        self.providers.push(provider);
    }

    /// Get a provider by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn LlmProvider> {
        self.providers
            .iter()
            .find(|p| p.name() == name)
            .map(AsRef::as_ref)
    }

    /// Get a provider by name or report it as unconfigured
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no adapter has that name.
    pub fn require(&self, name: &str) -> AppResult<&dyn LlmProvider> {
        self.get(name)
            .ok_or_else(|| AppError::config(format!("No LLM provider registered as '{name}'")))
    }

    /// List all registered providers
    #[must_use]
    pub fn list(&self) -> Vec<&dyn LlmProvider> {
        self.providers.iter().map(AsRef::as_ref).collect()
    }
}

impl Default for LlmProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
