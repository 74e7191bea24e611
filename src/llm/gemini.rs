// ABOUTME: Adapter for Google Gemini's generateContent endpoint
// ABOUTME: Flattens the conversation into one role-prefixed prompt and sends the key as a query parameter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Gemini Provider
//!
//! The conversation is flattened into a single user turn:
//!
//! ```text
//! System: <system prompt>
//!
//! User: <earlier message>
//!
//! Assistant: <earlier reply>
//!
//! User: <new message>
//! ```
//!
//! The reply is read from `candidates[0].content.parts[0].text`.

use std::fmt::{self, Debug, Formatter};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::transport::{build_client, key_shape_ok, map_send_error, non_empty, read_json, require_key};
use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use crate::config::environment::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::config::{ProviderConfig, ProviderEndpoint};
use crate::errors::AppResult;

const SERVICE: &str = "Gemini";

/// Environment variable holding the API key
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// Model used when the configured one is not a Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const KEY_PREFIX: &str = "AIza";
const KEY_MIN_LEN: usize = 30;

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiResponse {
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Google Gemini backend
pub struct GeminiProvider {
    client: Client,
    endpoint: ProviderEndpoint,
    generation_timeout: Duration,
}

impl GeminiProvider {
    /// Create the adapter from shared provider settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ProviderConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_client(config.generation_timeout)?,
            endpoint: config.gemini.clone(),
            generation_timeout: config.generation_timeout,
        })
    }

    /// Join every message into one role-prefixed prompt
    fn flatten_prompt(messages: &[ChatMessage]) -> String {
        messages
            .iter()
            .map(|msg| format!("{}: {}", msg.role.label(), msg.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn build_body(request: &ChatRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![GeminiPart {
                    text: Some(Self::flatten_prompt(&request.messages)),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                max_output_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            },
        }
    }
}

impl Debug for GeminiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("base_url", &self.endpoint.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn display_name(&self) -> &'static str {
        "Google Gemini"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::FLATTENED_PROMPT | LlmCapabilities::API_KEY
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }

    fn matches_model(&self, model: &str) -> bool {
        model.starts_with("gemini")
    }

    #[instrument(skip(self, request), fields(provider = "gemini", messages = request.messages.len()))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let api_key = require_key(&self.endpoint, API_KEY_ENV_VAR)?;
        let model = self.resolve_model(request.model.as_deref());
        let body = Self::build_body(request);
        debug!("Sending flattened prompt to {SERVICE}");

        let response = self
            .client
            .post(format!(
                "{}/models/{model}:generateContent",
                self.endpoint.base_url
            ))
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(SERVICE, e, self.generation_timeout))?;

        let parsed: GeminiResponse = read_json(SERVICE, response, self.generation_timeout).await?;
        let content = non_empty(SERVICE, parsed.into_text())?;

        Ok(ChatResponse { content, model })
    }

    async fn is_available(&self) -> bool {
        key_shape_ok(self.endpoint.api_key.as_deref(), KEY_PREFIX, KEY_MIN_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LlmProviderType;

    #[test]
    fn test_prompt_is_flattened_with_role_labels() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("Be brief."),
            ChatMessage::user("I feel tired"),
            ChatMessage::assistant("Rest helps."),
            ChatMessage::user("Thanks"),
        ]);
        let body = serde_json::to_value(GeminiProvider::build_body(&request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "System: Be brief.\n\nUser: I feel tired\n\nAssistant: Rest helps.\n\nUser: Thanks"
        );
        assert!(body["generationConfig"]["maxOutputTokens"].is_u64());
    }

    #[test]
    fn test_foreign_model_falls_back() {
        let provider = GeminiProvider::new(&ProviderConfig::new(LlmProviderType::Gemini)).unwrap();
        assert_eq!(provider.resolve_model(Some("gpt-4o")), DEFAULT_MODEL);
        assert_eq!(provider.resolve_model(Some("gemini-1.5-pro")), "gemini-1.5-pro");
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ProviderConfig::new(LlmProviderType::Gemini).with_endpoint(
            LlmProviderType::Gemini,
            ProviderEndpoint::new("http://localhost").with_api_key("AIzaSecretSecretSecretSecret1234"),
        );
        let provider = GeminiProvider::new(&config).unwrap();
        assert!(!format!("{provider:?}").contains("Secret"));
    }
}
