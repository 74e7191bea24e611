// ABOUTME: Adapter for the Anthropic Messages API
// ABOUTME: Moves the system prompt into its own parameter and authenticates with x-api-key plus a version header
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

const SERVICE: &str = "Anthropic";

/// Environment variable holding the API key
pub const API_KEY_ENV_VAR: &str = "ANTHROPIC_API_KEY";

/// Model used when the configured one is not a Claude model
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Messages API version sent with every request
const API_VERSION: &str = "2023-06-01";

const KEY_PREFIX: &str = "sk-ant-";
const KEY_MIN_LEN: usize = 20;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for AnthropicMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Anthropic Claude backend
pub struct AnthropicProvider {
    client: Client,
    endpoint: ProviderEndpoint,
    generation_timeout: Duration,
}

impl AnthropicProvider {
    /// Create the adapter from shared provider settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ProviderConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_client(config.generation_timeout)?,
            endpoint: config.anthropic.clone(),
            generation_timeout: config.generation_timeout,
        })
    }

    fn build_body<'a>(request: &'a ChatRequest, model: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model,
            system: request.system_prompt(),
            messages: request
                .conversation()
                .iter()
                .map(AnthropicMessage::from)
                .collect(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        }
    }
}

impl Debug for AnthropicProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnthropicProvider")
            .field("base_url", &self.endpoint.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn display_name(&self) -> &'static str {
        "Anthropic Claude"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_PARAMETER | LlmCapabilities::API_KEY
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }

    fn matches_model(&self, model: &str) -> bool {
        model.contains("claude")
    }

    #[instrument(skip(self, request), fields(provider = "anthropic", messages = request.messages.len()))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let api_key = require_key(&self.endpoint, API_KEY_ENV_VAR)?;
        let model = self.resolve_model(request.model.as_deref());
        let body = Self::build_body(request, &model);
        debug!(
            "Sending {} messages to {SERVICE} with system parameter",
            body.messages.len()
        );

        let response = self
            .client
            .post(format!("{}/v1/messages", self.endpoint.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(SERVICE, e, self.generation_timeout))?;

        let parsed: MessagesResponse =
            read_json(SERVICE, response, self.generation_timeout).await?;
        let text = parsed.content.into_iter().next().and_then(|block| block.text);
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
    fn test_system_prompt_moves_to_parameter() {
        let request = ChatRequest::new(vec![
            ChatMessage::system("Be warm."),
            ChatMessage::user("hello"),
        ]);
        let body = serde_json::to_value(AnthropicProvider::build_body(&request, DEFAULT_MODEL)).unwrap();

        assert_eq!(body["system"], "Be warm.");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
    }

    #[tokio::test]
    async fn test_availability_checks_key_shape_only() {
        let config = ProviderConfig::new(LlmProviderType::Anthropic).with_endpoint(
            LlmProviderType::Anthropic,
            ProviderEndpoint::new("http://127.0.0.1:9").with_api_key("sk-ant-api03-abcdefghijkl"),
        );
        let provider = AnthropicProvider::new(&config).unwrap();
        assert!(provider.is_available().await);
        assert_eq!(provider.resolve_model(Some("gpt-4o")), DEFAULT_MODEL);
    }
}
