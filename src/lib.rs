// ABOUTME: Main library entry point for the Mindwell companion backend
// ABOUTME: Wires configuration, logging, the LLM provider layer, persistence, reports, and services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

#![deny(unsafe_code)]

//! # Mindwell Server
//!
//! Backend core for a mental-health companion application. It ingests mood,
//! questionnaire, chat, and cognitive-exercise records, answers chat
//! messages through a pluggable text-generation provider, and builds
//! personal reports from the stored history.
//!
//! ## Architecture
//!
//! - **LLM**: one adapter per backend behind [`llm::LlmProvider`], dispatched by [`llm::ProviderRouter`]
//! - **Store**: the [`store::RecordStore`] persistence contract and an in-memory implementation
//! - **Reports**: [`reports::ReportComposer`] over the `mindwell-intelligence` engines
//! - **Services**: [`services::CompanionService`], the surface handlers call
//! - **Config**: environment-driven settings read once at startup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use mindwell_server::config::ServerConfig;
//! use mindwell_server::errors::AppResult;
//! use mindwell_server::llm::ProviderRouter;
//! use mindwell_server::services::CompanionService;
//! use mindwell_server::store::InMemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let router = Arc::new(ProviderRouter::from_config(config.provider)?);
//!     let service = CompanionService::new(Arc::new(InMemoryStore::new()), router);
//!
//!     let user = uuid::Uuid::new_v4();
//!     let reply = service.chat(user, "I couldn't sleep last night").await?;
//!     println!("{}", reply.record.response);
//!     Ok(())
//! }
//! ```

/// Environment-based configuration
pub mod config;

/// Error types re-exported from the core crate
pub mod errors;

/// Structured logging setup and domain event helpers
pub mod logging;

/// Text-generation provider abstraction, adapters, and router
pub mod llm;

/// Personal report composition
pub mod reports;

/// Domain services
pub mod services;

/// Record persistence contract and in-memory store
pub mod store;

pub use mindwell_core::{constants, models};
pub use mindwell_intelligence as intelligence;
