// ABOUTME: Enumerations chosen from the environment at startup: log verbosity, deployment, provider
// ABOUTME: Every parser is lenient and falls back to a default instead of failing startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Verbosity of the application's own log target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Failures only
    Error,
    /// Degraded provider calls and fallbacks
    Warn,
    /// Startup summary and per-request outcomes
    #[default]
    Info,
    /// Dispatch details and message previews
    Debug,
    /// Everything, including span events
    Trace,
}

impl LogLevel {
    /// Lenient parse; anything unrecognized is `Info`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Self::Error,
            "warn" | "warning" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }

    /// Directive text understood by `EnvFilter`
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Where the process is deployed; production switches logs to JSON
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local work (default)
    #[default]
    Development,
    /// Live deployment
    Production,
    /// Automated test runs
    Testing,
}

impl Environment {
    /// Environment variable naming the deployment environment
    pub const ENV_VAR: &'static str = "ENVIRONMENT";

    /// Lenient parse; anything unrecognized is `Development`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Read `ENVIRONMENT`
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|raw| Self::from_str_or_default(&raw))
            .unwrap_or_default()
    }

    /// Whether this is a live deployment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Text-generation backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Locally hosted Ollama server (default)
    #[default]
    Ollama,
    /// Google Gemini
    Gemini,
    /// Anthropic Messages API
    Anthropic,
    /// `OpenAI` chat completions
    #[serde(rename = "openai")]
    OpenAi,
}

impl LlmProviderType {
    /// Environment variable for provider selection
    pub const ENV_VAR: &'static str = "MINDWELL_LLM_PROVIDER";

    /// Environment variable for model selection
    pub const MODEL_ENV_VAR: &'static str = "MINDWELL_LLM_MODEL";

    /// Every supported provider
    pub const ALL: [Self; 4] = [Self::Ollama, Self::Gemini, Self::Anthropic, Self::OpenAi];

    /// Lenient parse accepting vendor aliases; anything unrecognized is `Ollama`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Self::Gemini,
            "anthropic" | "claude" => Self::Anthropic,
            "openai" | "gpt" => Self::OpenAi,
            _ => Self::Ollama,
        }
    }

    /// Read `MINDWELL_LLM_PROVIDER`
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|raw| Self::from_str_or_default(&raw))
            .unwrap_or_default()
    }

    /// Registry key of the adapter serving this provider
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::Gemini => "gemini",
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }

    /// Whether the provider authenticates with an API key
    #[must_use]
    pub const fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
