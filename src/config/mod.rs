// ABOUTME: Configuration management module for provider, logging, and environment settings
// ABOUTME: Re-exports the environment loader and the strongly typed configuration enums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors
//! Configuration module
//!
//! - **Environment**: provider selection, credentials, and deadlines from environment variables
//! - **Types**: `LogLevel`, `Environment`, and `LlmProviderType`

/// Environment-based configuration loading
pub mod environment;
/// Strongly typed configuration enums
pub mod types;

pub use environment::{ProviderConfig, ProviderEndpoint, ServerConfig};
pub use types::{Environment, LlmProviderType, LogLevel};
