// ABOUTME: Record persistence abstraction consumed by the companion service and report composer
// ABOUTME: Append-only inserts, time-window queries, and the mood upsert keyed on user and date
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Record Store
//!
//! The store is the only place records live and the only point where
//! concurrent requests meet. Implementations must resolve concurrent mood
//! writes for the same `(user, date)` as last writer wins.
//!
//! Every query returns canonical types: assessments come back as
//! [`AssessmentSummary`] values, so callers never branch on record shape.

pub mod memory;

pub use memory::InMemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mindwell_core::models::{
    AssessmentRecord, AssessmentSummary, ChatRecord, CognitiveRecord, MoodRecord,
};
use uuid::Uuid;

use crate::errors::AppResult;

/// Core persistence trait
///
/// All storage backends implement this trait so the service layer stays
/// independent of where records are kept.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ================================
    // Chat
    // ================================

    /// Append a chat exchange
    async fn insert_chat(&self, record: &ChatRecord) -> AppResult<()>;

    /// Chat records created within `[from, to]`, oldest first
    async fn chats_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ChatRecord>>;

    /// Most recent `limit` chat records, newest first
    async fn recent_chats(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<ChatRecord>>;

    /// Total chat records for a user
    async fn count_chats(&self, user_id: Uuid) -> AppResult<usize>;

    // ================================
    // Assessments
    // ================================

    /// Append a scored assessment
    async fn insert_assessment(&self, record: &AssessmentRecord) -> AppResult<()>;

    /// Most recent full assessment record
    async fn latest_assessment(&self, user_id: Uuid) -> AppResult<Option<AssessmentRecord>>;

    /// Most recent `limit` assessments, newest first
    async fn recent_assessments(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> AppResult<Vec<AssessmentSummary>>;

    /// Total assessments for a user
    async fn count_assessments(&self, user_id: Uuid) -> AppResult<usize>;

    // ================================
    // Mood
    // ================================

    /// Insert or replace the mood entry for `(user, date)`; returns the stored entry
    async fn upsert_mood(&self, record: MoodRecord) -> AppResult<MoodRecord>;

    /// Mood entries dated within `[from, to]`, oldest first
    async fn moods_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<MoodRecord>>;

    /// Every mood entry, oldest first
    async fn all_moods(&self, user_id: Uuid) -> AppResult<Vec<MoodRecord>>;

    // ================================
    // Cognitive exercises
    // ================================

    /// Append a cognitive restructuring exercise
    async fn insert_cognitive(&self, record: &CognitiveRecord) -> AppResult<()>;

    /// Every cognitive exercise, oldest first
    async fn cognitive_records(&self, user_id: Uuid) -> AppResult<Vec<CognitiveRecord>>;
}
