// ABOUTME: Deterministic analytics engines for the Mindwell companion backend
// ABOUTME: Assessment scoring, history aggregation, and rule-based recommendations without I/O
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

#![deny(unsafe_code)]

//! # Mindwell Intelligence
//!
//! Pure functions over record history. Nothing in this crate performs I/O or
//! holds state between calls, so every engine can be shared freely across
//! concurrent requests.

/// PHQ-9 questionnaire scoring
pub mod assessment;

/// Trend, consistency, engagement, wellbeing, and concern derivations
pub mod analytics;

/// Recommendation and next-step rule chains
pub mod recommendation_engine;

pub use analytics::{
    AnalyticsAggregator, AssessmentImprovement, Concern, Consistency, Engagement, Trend, Wellbeing,
};
pub use assessment::{score_assessment, AssessmentScorer};
pub use recommendation_engine::{
    NextStep, Recommendation, RecommendationContext, RecommendationEngine,
    RecommendationEngineConfig,
};
