// ABOUTME: Core types and constants for the Mindwell companion backend
// ABOUTME: Foundation crate with error handling, record models, and domain constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

#![deny(unsafe_code)]

//! # Mindwell Core
//!
//! Foundation crate providing shared types and constants for the Mindwell
//! companion backend. It changes rarely so the rest of the workspace can
//! compile incrementally on top of it.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, and the `ErrorKind` failure taxonomy
//! - **constants**: thresholds, windows, deadlines, and fixed user-facing texts
//! - **models**: mood, assessment, chat, and cognitive-exercise records

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Record models and shared enums
pub mod models;
