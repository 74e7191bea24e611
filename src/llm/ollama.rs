// ABOUTME: Adapter for a locally hosted Ollama server using its native chat API
// ABOUTME: Sends the role-tagged message array and reads the reply from message.content
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Ollama Provider
//!
//! - Chat: `POST {base}/api/chat` with `stream: false`
//! - Liveness: `GET {base}/api/tags`, bounded by the liveness deadline
//!
//! Ollama serves whatever models have been pulled locally, so any non-empty
//! model id is accepted as-is.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::transport::{build_client, map_send_error, non_empty, read_json};
use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use crate::config::environment::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use crate::config::{ProviderConfig, ProviderEndpoint};
use crate::errors::AppResult;

const SERVICE: &str = "Ollama";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "mistral:7b-instruct";

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> From<&'a ChatMessage> for OllamaMessage<'a> {
    fn from(msg: &'a ChatMessage) -> Self {
        Self {
            role: msg.role.as_str(),
            content: &msg.content,
        }
    }
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaReply>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    content: Option<String>,
}

// ============================================================================
// Provider Implementation
// ============================================================================

/// Locally hosted Ollama backend
pub struct OllamaProvider {
    client: Client,
    endpoint: ProviderEndpoint,
    generation_timeout: Duration,
    liveness_timeout: Duration,
}

impl OllamaProvider {
    /// Create the adapter from shared provider settings
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ProviderConfig) -> AppResult<Self> {
        Ok(Self {
            client: build_client(config.generation_timeout)?,
            endpoint: config.ollama.clone(),
            generation_timeout: config.generation_timeout,
            liveness_timeout: config.liveness_timeout,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.endpoint.base_url)
    }

    fn build_body<'a>(request: &'a ChatRequest, model: &'a str) -> OllamaChatRequest<'a> {
        OllamaChatRequest {
            model,
            messages: request.messages.iter().map(OllamaMessage::from).collect(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
                num_predict: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            },
        }
    }
}

impl Debug for OllamaProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("OllamaProvider")
            .field("base_url", &self.endpoint.base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn display_name(&self) -> &'static str {
        "Ollama (Local)"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::LOCAL
    }

    fn default_model(&self) -> &'static str {
        DEFAULT_MODEL
    }

    fn matches_model(&self, model: &str) -> bool {
        !model.trim().is_empty()
    }

    #[instrument(skip(self, request), fields(provider = "ollama", messages = request.messages.len()))]
    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        let model = self.resolve_model(request.model.as_deref());
        let body = Self::build_body(request, &model);
        debug!("Sending {} messages to {SERVICE}", body.messages.len());

        let response = self
            .client
            .post(self.api_url("chat"))
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(SERVICE, e, self.generation_timeout))?;

        let parsed: OllamaChatResponse =
            read_json(SERVICE, response, self.generation_timeout).await?;
        let content = non_empty(SERVICE, parsed.message.and_then(|reply| reply.content))?;

        Ok(ChatResponse {
            content,
            model: parsed.model.unwrap_or(model),
        })
    }

    async fn is_available(&self) -> bool {
        match self
            .client
            .get(self.api_url("tags"))
            .timeout(self.liveness_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("{SERVICE} liveness probe failed: {e}");
                false
            }
        }
    }
}
