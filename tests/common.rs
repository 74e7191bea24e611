// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, mock provider servers, and record fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `mindwell_server`

use std::env;
use std::sync::{Arc, Once};
use std::time::Duration;

use mindwell_server::config::{LlmProviderType, ProviderConfig, ProviderEndpoint};
use mindwell_server::llm::ProviderRouter;
use mindwell_server::models::CognitiveDraft;
use mindwell_server::services::CompanionService;
use mindwell_server::store::InMemoryStore;
use serde_json::{json, Value};
use tracing::Level;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Port nothing listens on, for connection failures
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Ollama settings pointed at `base_url`
pub fn ollama_config(base_url: &str) -> ProviderConfig {
    ProviderConfig::new(LlmProviderType::Ollama)
        .with_endpoint(LlmProviderType::Ollama, ProviderEndpoint::new(base_url))
        .with_generation_timeout(Duration::from_secs(5))
        .with_liveness_timeout(Duration::from_secs(2))
}

/// Settings for a credential provider pointed at `base_url`
pub fn keyed_config(provider: LlmProviderType, base_url: &str, api_key: &str) -> ProviderConfig {
    ProviderConfig::new(provider)
        .with_endpoint(provider, ProviderEndpoint::new(base_url).with_api_key(api_key))
        .with_generation_timeout(Duration::from_secs(5))
}

/// Router over `config`
pub fn router(config: ProviderConfig) -> Arc<ProviderRouter> {
    init_test_logging();
    Arc::new(ProviderRouter::from_config(config).unwrap())
}

/// Body of a successful Ollama chat reply
pub fn ollama_reply(content: &str) -> Value {
    json!({
        "model": "mistral:7b-instruct",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

/// Mock Ollama server that is alive and answers every chat with `content`
pub async fn live_ollama(content: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_reply(content)))
        .mount(&server)
        .await;
    server
}

/// Companion service over a fresh in-memory store
pub fn companion(router: Arc<ProviderRouter>) -> (CompanionService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (CompanionService::new(store.clone(), router), store)
}

/// A valid cognitive exercise with the given situation and feelings
pub fn cognitive_draft(situation: &str, before: i64, after: i64) -> CognitiveDraft {
    CognitiveDraft {
        situation: situation.to_owned(),
        automatic_thought: "I will fail".to_owned(),
        emotion_intensity: 70,
        evidence: "I prepared well".to_owned(),
        alternative: "I can handle this".to_owned(),
        re_rate: 40,
        before_feeling: before,
        after_feeling: after,
    }
}

/// JSON bodies of every request received on `endpoint`, in arrival order
pub async fn request_bodies(server: &MockServer, endpoint: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == endpoint)
        .map(|request| request.body_json::<Value>().unwrap())
        .collect()
}
