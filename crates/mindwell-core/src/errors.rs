// ABOUTME: Unified error handling with error codes, failure kinds, and HTTP status mapping
// ABOUTME: Every fallible operation in the workspace returns AppResult built from these types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Unified Error Handling System
//!
//! A single [`AppError`] type flows through the whole workspace. The
//! [`ErrorCode`] says precisely what went wrong and how the request-handling
//! layer should answer; the coarser [`ErrorKind`] is the failure taxonomy
//! surfaced to callers of the provider router (`config`, `timeout`,
//! `connection`, `provider`, `parse`, `validation`).

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Caller input is invalid
    InvalidInput = 3000,
    /// A required field is absent
    MissingRequiredField = 3001,
    /// Input could not be parsed
    InvalidFormat = 3002,
    /// A numeric value lies outside its allowed range
    ValueOutOfRange = 3003,

    // Resource Management (4000-4999)
    /// Requested record does not exist
    ResourceNotFound = 4000,
    /// A record with the same unique key already exists
    ResourceAlreadyExists = 4001,

    // External Services (5000-5999)
    /// Provider answered with a non-success status
    ExternalServiceError = 5000,
    /// Provider could not be reached
    ExternalServiceUnavailable = 5001,
    /// Provider rejected our credential
    ExternalAuthFailed = 5002,
    /// Provider throttled the request
    ExternalRateLimited = 5003,
    /// Provider did not answer before the deadline
    ExternalServiceTimeout = 5004,
    /// Provider answered with a body we could not interpret
    ExternalResponseInvalid = 5005,

    // Configuration (6000-6999)
    /// Generic configuration problem
    ConfigError = 6000,
    /// Required configuration value is missing
    ConfigMissing = 6001,
    /// Configuration value is malformed
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    InternalError = 9000,
    /// Persistence collaborator failure
    StorageError = 9002,
    /// Serialization or deserialization failure
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::ValueOutOfRange => 400,

            Self::ResourceNotFound => 404,

            Self::ResourceAlreadyExists => 409,

            Self::ExternalServiceError
            | Self::ExternalServiceUnavailable
            | Self::ExternalResponseInvalid => 502,

            Self::ExternalAuthFailed | Self::ExternalRateLimited => 503,

            Self::ExternalServiceTimeout => 504,

            Self::InternalError
            | Self::StorageError
            | Self::SerializationError
            | Self::ConfigError
            | Self::ConfigMissing
            | Self::ConfigInvalid => 500,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ResourceAlreadyExists => "A resource with this identifier already exists",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ExternalAuthFailed => "Authentication with external service failed",
            Self::ExternalRateLimited => "External service rate limit exceeded",
            Self::ExternalServiceTimeout => "An external service did not respond in time",
            Self::ExternalResponseInvalid => "An external service returned an unexpected response",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal server error occurred",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }

    /// Collapse this code onto the caller-facing failure taxonomy
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::ValueOutOfRange => ErrorKind::Validation,
            Self::ConfigError | Self::ConfigMissing | Self::ConfigInvalid => ErrorKind::Config,
            Self::ExternalServiceTimeout => ErrorKind::Timeout,
            Self::ExternalServiceUnavailable => ErrorKind::Connection,
            Self::ExternalServiceError | Self::ExternalAuthFailed | Self::ExternalRateLimited => {
                ErrorKind::Provider
            }
            Self::ExternalResponseInvalid | Self::SerializationError => ErrorKind::Parse,
            Self::ResourceNotFound
            | Self::ResourceAlreadyExists
            | Self::InternalError
            | Self::StorageError => ErrorKind::Internal,
        }
    }
}

/// Failure taxonomy reported alongside unsuccessful generations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Missing or malformed credential; no network attempt was made
    Config,
    /// Deadline expired before the provider answered
    Timeout,
    /// Provider endpoint could not be reached
    Connection,
    /// Provider answered with a non-success HTTP status
    Provider,
    /// Provider answered with an unexpected body shape
    Parse,
    /// Caller input violated a contract
    Validation,
    /// Anything else
    Internal,
}

impl ErrorKind {
    /// Stable snake-case label used in logs and serialized results
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Timeout => "timeout",
            Self::Connection => "connection",
            Self::Provider => "provider",
            Self::Parse => "parse",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Structured details for the response envelope
    pub details: serde_json::Value,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: serde_json::Value::Null,
            source: None,
        }
    }

    /// Add details to the error
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Failure kind of this error
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.code.kind()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an [`ErrorResponse`]
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional structured details
    #[serde(skip_serializing_if = "serde_json::Value::is_null", default)]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                details: error.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Invalid input
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Value outside its permitted range
    #[must_use]
    pub fn value_out_of_range(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValueOutOfRange, message)
    }

    /// Required field missing
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
    }

    /// Resource not found
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Internal server error
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Persistence failure
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Required configuration value absent
    #[must_use]
    pub fn config_missing(variable: &str) -> Self {
        Self::new(
            ErrorCode::ConfigMissing,
            format!("{variable} is not configured"),
        )
    }

    /// External service error
    #[must_use]
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// Non-success HTTP status from a provider, keeping a bounded body excerpt
    #[must_use]
    pub fn provider_status(service: &str, status: u16, body: &str) -> Self {
        let code = match status {
            401 | 403 => ErrorCode::ExternalAuthFailed,
            429 => ErrorCode::ExternalRateLimited,
            _ => ErrorCode::ExternalServiceError,
        };
        let excerpt: String = body.chars().take(200).collect();
        Self::new(code, format!("{service}: API error ({status}): {excerpt}")).with_details(
            serde_json::json!({
                "status": status,
                "body": excerpt,
            }),
        )
    }

    /// Provider deadline expired
    #[must_use]
    pub fn timeout(service: &str, seconds: u64) -> Self {
        Self::new(
            ErrorCode::ExternalServiceTimeout,
            format!("{service}: no response within {seconds}s"),
        )
    }

    /// Provider unreachable
    #[must_use]
    pub fn connection(service: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{service}: {}", message.into()),
        )
    }

    /// Provider body did not have the expected shape
    #[must_use]
    pub fn parse_failure(service: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalResponseInvalid,
            format!("{service}: {}", message.into()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_http_status() {
        assert_eq!(ErrorCode::InvalidInput.http_status(), 400);
        assert_eq!(ErrorCode::ResourceNotFound.http_status(), 404);
        assert_eq!(ErrorCode::ExternalServiceTimeout.http_status(), 504);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
    }

    #[test]
    fn test_error_kind_mapping() {
        assert_eq!(ErrorCode::ConfigMissing.kind(), ErrorKind::Config);
        assert_eq!(ErrorCode::ExternalServiceTimeout.kind(), ErrorKind::Timeout);
        assert_eq!(
            ErrorCode::ExternalServiceUnavailable.kind(),
            ErrorKind::Connection
        );
        assert_eq!(ErrorCode::ExternalRateLimited.kind(), ErrorKind::Provider);
        assert_eq!(ErrorCode::ExternalResponseInvalid.kind(), ErrorKind::Parse);
        assert_eq!(ErrorCode::ValueOutOfRange.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_provider_status_truncates_body() {
        let body = "x".repeat(500);
        let error = AppError::provider_status("Ollama", 500, &body);

        assert_eq!(error.code, ErrorCode::ExternalServiceError);
        assert_eq!(error.details["status"], 500);
        assert_eq!(error.details["body"].as_str().unwrap().len(), 200);
        assert_eq!(
            AppError::provider_status("Gemini", 401, "").code,
            ErrorCode::ExternalAuthFailed
        );
    }

    #[test]
    fn test_error_response_serialization() {
        let response = ErrorResponse::from(AppError::value_out_of_range(
            "Score must be between 1 and 5",
        ));

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("VALUE_OUT_OF_RANGE"));
        assert!(json.contains("Score must be between 1 and 5"));
        assert!(!json.contains("details"));
    }
}
