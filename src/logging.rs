// ABOUTME: Tracing subscriber setup driven by RUST_LOG, LOG_FORMAT, and ENVIRONMENT
// ABOUTME: Configures log levels, formatters, and domain event helpers for the companion backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! Structured logging configuration

use anyhow::Result;
use mindwell_core::constants::service_names;
use mindwell_core::errors::ErrorKind;
use serde_json::json;
use std::env;
use std::io;
use tracing::{info, warn};
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use uuid::Uuid;

use crate::config::{Environment, LogLevel};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
    /// Include span open/close events
    pub include_spans: bool,
    /// Service name for structured logging
    pub service_name: String,
    /// Service version
    pub service_version: String,
    /// Deployment environment
    pub environment: Environment,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `JSON` format for production logging
    Json,
    /// Pretty format for development
    Pretty,
    /// Compact format for space-constrained environments
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Pretty,
            include_location: false,
            include_spans: false,
            service_name: service_names::MINDWELL_SERVER.into(),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment: Environment::Development,
        }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("RUST_LOG")
            .map(|raw| LogLevel::from_str_or_default(&raw))
            .unwrap_or_default();

        let format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            Ok("compact") => LogFormat::Compact,
            _ => LogFormat::Pretty,
        };

        let environment = Environment::from_env();
        let is_production = environment.is_production();

        Self {
            level,
            format: if is_production && env::var("LOG_FORMAT").is_err() {
                LogFormat::Json
            } else {
                format
            },
            include_location: is_production || env::var("LOG_INCLUDE_LOCATION").is_ok(),
            include_spans: env::var("LOG_INCLUDE_SPANS").is_ok(),
            service_name: env::var("SERVICE_NAME")
                .unwrap_or_else(|_| service_names::MINDWELL_SERVER.into()),
            service_version: env!("CARGO_PKG_VERSION").to_owned(),
            environment,
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let base = env::var("RUST_LOG").map_or_else(
            |_| EnvFilter::new(self.level.to_string()),
            |directive| EnvFilter::new(&directive),
        );

        let app_directive = format!("mindwell_server={}", self.level);
        ["hyper=warn", "reqwest=warn", "h2=warn", app_directive.as_str()]
            .into_iter()
            .fold(base, |filter, directive| {
                match directive.parse::<Directive>() {
                    Ok(parsed) => filter.add_directive(parsed),
                    Err(_) => filter,
                }
            })
    }

    /// Initialize the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if a global subscriber is already installed
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter());
        let span_events = if self.include_spans {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        match self.format {
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events)
                    .json();
                registry.with(json_layer).try_init()?;
            }
            LogFormat::Pretty => {
                let pretty_layer = fmt::layer()
                    .with_file(self.include_location)
                    .with_line_number(self.include_location)
                    .with_target(true)
                    .with_writer(io::stdout)
                    .with_span_events(span_events);
                registry.with(pretty_layer).try_init()?;
            }
            LogFormat::Compact => {
                let compact_layer = fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(io::stdout)
                    .with_span_events(FmtSpan::NONE);
                registry.with(compact_layer).try_init()?;
            }
        }

        self.log_startup_info();
        Ok(())
    }

    fn log_startup_info(&self) {
        info!(
            service.name = %self.service_name,
            service.version = %self.service_version,
            environment = %self.environment,
            log.level = %self.level,
            log.format = ?self.format,
            "Mindwell companion backend starting up"
        );

        let config_summary = json!({
            "service": {
                "name": self.service_name,
                "version": self.service_version,
                "environment": self.environment.to_string(),
            },
            "logging": {
                "level": self.level.to_string(),
                "format": format!("{:?}", self.format),
                "location": self.include_location,
                "spans": self.include_spans,
            }
        });
        info!("Configuration loaded: {}", config_summary);
    }
}

/// Initialize logging from environment
///
/// # Errors
///
/// Returns an error if logging initialization fails
pub fn init_from_env() -> Result<()> {
    LoggingConfig::from_env().init()
}

/// Characters of user text allowed into debug logs
const PREVIEW_CHARS: usize = 50;

/// Truncate user text for debug logging
#[must_use]
pub fn preview(text: &str) -> String {
    let mut shortened: String = text.chars().take(PREVIEW_CHARS).collect();
    if text.chars().count() > PREVIEW_CHARS {
        shortened.push_str("...");
    }
    shortened
}

/// Structured domain event helpers
pub struct AppLogger;

impl AppLogger {
    /// Log the outcome of a generation call
    pub fn log_generation(provider: &str, model: &str, duration_ms: u64, failure: Option<ErrorKind>) {
        match failure {
            None => info!(
                llm.provider = %provider,
                llm.model = %model,
                llm.duration_ms = duration_ms,
                llm.success = true,
                "Generation completed"
            ),
            Some(kind) => warn!(
                llm.provider = %provider,
                llm.model = %model,
                llm.duration_ms = duration_ms,
                llm.success = false,
                llm.error_kind = %kind,
                "Generation failed"
            ),
        }
    }

    /// Log a mood upsert
    pub fn log_mood_recorded(user_id: Uuid, date: chrono::NaiveDate, score: u8) {
        info!(user.id = %user_id, mood.date = %date, mood.score = score, "Mood recorded");
    }

    /// Log an assessment submission
    pub fn log_assessment(user_id: Uuid, total: i64, level: &str, crisis: bool) {
        if crisis {
            warn!(
                user.id = %user_id,
                assessment.total = total,
                assessment.level = %level,
                assessment.crisis = true,
                "Assessment submitted with crisis indicator"
            );
        } else {
            info!(
                user.id = %user_id,
                assessment.total = total,
                assessment.level = %level,
                assessment.crisis = false,
                "Assessment submitted"
            );
        }
    }

    /// Log a composed report
    pub fn log_report(user_id: Uuid, recommendations: usize, insights_available: bool) {
        info!(
            user.id = %user_id,
            report.recommendations = recommendations,
            report.insights_available = insights_available,
            "Personal report generated"
        );
    }
}
