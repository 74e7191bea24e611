// ABOUTME: Error types shared across the server, re-exported from the core crate
// ABOUTME: Adds conversions from transport and serialization failures into AppError
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Unified Error Handling
//!
//! [`AppError`] lives in `mindwell-core` so the engines can return it
//! without depending on this crate. This module re-exports it for the rest
//! of the server.

pub use mindwell_core::errors::{
    AppError, AppResult, ErrorCode, ErrorKind, ErrorResponse, ErrorResponseDetails,
};

/// Convert a JSON failure into a serialization error
#[must_use]
pub fn from_json_error(error: serde_json::Error) -> AppError {
    AppError::new(
        ErrorCode::SerializationError,
        format!("JSON processing failed: {error}"),
    )
    .with_source(error)
}
