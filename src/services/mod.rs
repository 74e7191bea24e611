// ABOUTME: Domain service layer exposed to the request-handling collaborator
// ABOUTME: Protocol-agnostic operations over the record store, scorer, router, and report composer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! Domain service layer
//!
//! Nothing here knows about HTTP. Handlers parse a request, call one
//! operation, and render its result or [`AppError`](crate::errors::AppError).

/// Chat, assessment, mood, cognitive, and report operations
pub mod companion;

pub use companion::{ChatReply, CompanionService, MoodSummary, SummaryTrend};
