// ABOUTME: Unit tests for the LLM provider abstraction and registry
// ABOUTME: Validates capability flags, message types, model resolution, and router dispatch via a stub adapter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use mindwell_server::config::{LlmProviderType, ProviderConfig};
use mindwell_server::errors::{AppError, AppResult, ErrorKind};
use mindwell_server::llm::{
    ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, LlmProviderRegistry,
    MessageRole, ProviderRouter,
};

// =============================================================================
// Stub Adapter
// =============================================================================

struct ScriptedProvider {
    name: &'static str,
    reply: Result<&'static str, ErrorKind>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new(name: &'static str, reply: Result<&'static str, ErrorKind>) -> Self {
        Self {
            name,
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn display_name(&self) -> &'static str {
        "Scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::SYSTEM_MESSAGES | LlmCapabilities::LOCAL
    }

    fn default_model(&self) -> &'static str {
        "scripted-small"
    }

    fn matches_model(&self, model: &str) -> bool {
        model.starts_with("scripted")
    }

    async fn complete(&self, request: &ChatRequest) -> AppResult<ChatResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Ok(text) => Ok(ChatResponse {
                content: text.to_owned(),
                model: request.model.clone().unwrap_or_default(),
            }),
            Err(ErrorKind::Timeout) => Err(AppError::timeout("Scripted", 30)),
            Err(ErrorKind::Connection) => Err(AppError::connection("Scripted", "refused")),
            Err(_) => Err(AppError::provider_status("Scripted", 502, "bad gateway")),
        }
    }

    async fn is_available(&self) -> bool {
        self.reply.is_ok()
    }
}

fn scripted_router(reply: Result<&'static str, ErrorKind>) -> (ProviderRouter, Arc<AtomicUsize>) {
    let provider = ScriptedProvider::new("ollama", reply);
    let calls = Arc::clone(&provider.calls);
    let mut registry = LlmProviderRegistry::new();
    registry.register(Box::new(provider));
    (
        ProviderRouter::with_registry(ProviderConfig::new(LlmProviderType::Ollama), registry),
        calls,
    )
}

// =============================================================================
// LlmCapabilities Tests
// =============================================================================

#[test]
fn test_standard_adapter_capabilities() {
    let registry = LlmProviderRegistry::from_config(&ProviderConfig::new(LlmProviderType::Ollama))
        .unwrap();

    let ollama = registry.get("ollama").unwrap().capabilities();
    assert!(ollama.is_local());
    assert!(!ollama.requires_api_key());
    assert!(ollama.contains(LlmCapabilities::SYSTEM_MESSAGES));

    let gemini = registry.get("gemini").unwrap().capabilities();
    assert!(gemini.contains(LlmCapabilities::FLATTENED_PROMPT));
    assert!(gemini.requires_api_key());

    let anthropic = registry.get("anthropic").unwrap().capabilities();
    assert!(anthropic.contains(LlmCapabilities::SYSTEM_PARAMETER));

    let openai = registry.get("openai").unwrap().capabilities();
    assert!(openai.contains(LlmCapabilities::SYSTEM_MESSAGES));
    assert!(!openai.is_local());
}

// =============================================================================
// Message and Request Tests
// =============================================================================

#[test]
fn test_message_roles_serialize_lowercase() {
    let message = ChatMessage::assistant("hello");
    let value = serde_json::to_value(&message).unwrap();
    assert_eq!(value["role"], "assistant");
    assert_eq!(MessageRole::System.label(), "System");
}

#[test]
fn test_request_splits_system_prompt_from_conversation() {
    let request = ChatRequest::new(vec![
        ChatMessage::system("Be kind."),
        ChatMessage::user("hi"),
        ChatMessage::assistant("hello"),
    ])
    .with_temperature(0.2)
    .with_max_tokens(64);

    assert_eq!(request.system_prompt(), Some("Be kind."));
    assert_eq!(request.conversation().len(), 2);
    assert_eq!(request.max_tokens, Some(64));

    let bare = ChatRequest::new(vec![ChatMessage::user("hi")]);
    assert_eq!(bare.system_prompt(), None);
    assert_eq!(bare.conversation().len(), 1);
}

// =============================================================================
// Model Resolution Tests
// =============================================================================

#[test]
fn test_resolve_model_substitutes_default() {
    let provider = ScriptedProvider::new("ollama", Ok("ok"));
    assert_eq!(provider.resolve_model(None), "scripted-small");
    assert_eq!(provider.resolve_model(Some("  ")), "scripted-small");
    assert_eq!(provider.resolve_model(Some("gpt-4o")), "scripted-small");
    assert_eq!(provider.resolve_model(Some("scripted-large")), "scripted-large");
}

#[test]
fn test_standard_adapters_reject_foreign_models() {
    let registry = LlmProviderRegistry::from_config(&ProviderConfig::new(LlmProviderType::Ollama))
        .unwrap();

    let gemini = registry.get("gemini").unwrap();
    assert_eq!(gemini.resolve_model(Some("claude-3-opus")), "gemini-2.5-flash");
    let openai = registry.get("openai").unwrap();
    assert_eq!(openai.resolve_model(Some("o3-mini")), "o3-mini");
    assert_eq!(openai.resolve_model(Some("mistral")), "gpt-4o-mini");
    let ollama = registry.get("ollama").unwrap();
    assert_eq!(ollama.resolve_model(Some("llama3:8b")), "llama3:8b");
}

// =============================================================================
// Registry Tests
// =============================================================================

#[test]
fn test_registry_replaces_same_name() {
    let mut registry = LlmProviderRegistry::new();
    registry.register(Box::new(ScriptedProvider::new("ollama", Ok("first"))));
    registry.register(Box::new(ScriptedProvider::new("ollama", Ok("second"))));
    registry.register(Box::new(ScriptedProvider::new("gemini", Ok("third"))));

    assert_eq!(registry.list().len(), 2);
    assert!(registry.get("openai").is_none());
    let error = registry.require("openai").err().unwrap();
    assert_eq!(error.kind(), ErrorKind::Config);
}

#[test]
fn test_standard_registry_covers_every_provider() {
    let registry = LlmProviderRegistry::from_config(&ProviderConfig::new(LlmProviderType::Ollama))
        .unwrap();
    for provider in LlmProviderType::ALL {
        assert!(registry.get(provider.as_str()).is_some(), "{provider}");
    }
}

// =============================================================================
// Router Dispatch Tests
// =============================================================================

#[tokio::test]
async fn test_router_dispatches_to_configured_adapter() {
    let (router, calls) = scripted_router(Ok("Glad you reached out."));

    let result = router.generate("hello", &[]).await;

    assert!(result.success());
    assert_eq!(result.text(), "Glad you reached out.");
    assert_eq!(result.model_used(), "scripted-small");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(router.is_available().await);
}

#[tokio::test]
async fn test_router_normalizes_adapter_errors() {
    for (kind, expected) in [
        (ErrorKind::Timeout, ErrorKind::Timeout),
        (ErrorKind::Connection, ErrorKind::Connection),
        (ErrorKind::Provider, ErrorKind::Provider),
    ] {
        let (router, _) = scripted_router(Err(kind));
        let result = router.generate("hello", &[]).await;
        assert!(!result.success());
        assert_eq!(result.error_kind(), Some(expected));
        assert!(result.text().starts_with("I apologize"));
    }
}

#[tokio::test]
async fn test_router_without_adapter_reports_config_failure() {
    let router = ProviderRouter::with_registry(
        ProviderConfig::new(LlmProviderType::Anthropic),
        LlmProviderRegistry::new(),
    );

    let result = router.generate("hello", &[]).await;

    assert_eq!(result.error_kind(), Some(ErrorKind::Config));
    assert!(!router.is_available().await);
}

#[tokio::test]
async fn test_generation_result_serializes_without_kind_on_success() {
    let (router, _) = scripted_router(Ok("fine"));
    let value = serde_json::to_value(router.generate("hi", &[]).await).unwrap();
    assert_eq!(value["success"], true);
    assert!(value.get("error_kind").is_none());

    let (router, _) = scripted_router(Err(ErrorKind::Timeout));
    let value = serde_json::to_value(router.generate("hi", &[]).await).unwrap();
    assert_eq!(value["error_kind"], "timeout");
}
