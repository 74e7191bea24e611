// ABOUTME: Adapter for OpenAI-style chat completions
// ABOUTME: Sends the role-tagged array with bearer auth and reads choices[0].message.content
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

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

const SERVICE: &str = "OpenAI";

/// Environment variable holding the API key
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Model used when the configured one is not an `OpenAI` model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const MODEL_PREFIXES: [&str; 4] = ["gpt", "o1", "o3", "o4"];

const KEY_PREFIX: &str = "sk-";
const KEY_MIN_LEN: usize = 20;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OpenAiMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

/// `OpenAI` chat completions backend
pub struct OpenAiProvider {
    client: Client,
    endpoint: ProviderEndpoint,
    generation_timeout: Duration,
}

impl OpenAiProvider {
    /// Create the adapter from shared provider settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ProviderConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_client(config.generation_timeout)?,
            endpoint: config.openai.clone(),
            generation_timeout: config.generation_timeout,
        })
    }

    fn build_body<'a>(request: &'a ChatRequest, model: &'a str) -> CompletionRequest<'a> {
        CompletionRequest {
            model,
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
        }
    }
}

impl Debug for OpenAiProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("base_url", &self.endpoint.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn display_name(&self) -> &'static str {
        "OpenAI"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::API_KEY
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }

    fn matches_model(&self, model: &str) -> bool {
        MODEL_PREFIXES.iter().any(|prefix| model.starts_with(prefix))
    }

    #[instrument(skip(self, request), fields(provider = "openai", messages = request.messages.len()))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let api_key = require_key(&self.endpoint, API_KEY_ENV_VAR)?;
        let model = self.resolve_model(request.model.as_deref());
        let body = Self::build_body(request, &model);
        debug!("Sending {} messages to {SERVICE}", body.messages.len());

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.endpoint.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(SERVICE, e, self.generation_timeout))?;

        let parsed: CompletionResponse =
            read_json(SERVICE, response, self.generation_timeout).await?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);
        let content = non_empty(SERVICE, text)?;

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or(model),
        })
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
    fn test_model_prefixes() {
        let provider = OpenAiProvider::new(&ProviderConfig::new(LlmProviderType::OpenAi)).unwrap();
        assert!(provider.matches_model("gpt-4o"));
        assert!(provider.matches_model("o3-mini"));
        assert!(!provider.matches_model("claude-3-opus"));
        assert_eq!(provider.resolve_model(Some("mistral")), DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_missing_key_is_unavailable() {
        let provider = OpenAiProvider::new(&ProviderConfig::new(LlmProviderType::OpenAi)).unwrap();
        assert!(!provider.is_available().await);
    }
}
