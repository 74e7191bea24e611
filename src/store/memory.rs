// ABOUTME: In-process RecordStore backed by sharded concurrent maps
// ABOUTME: Serves tests and the diagnostic binary; mood upserts are atomic per (user, date) entry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

use std::cmp::Reverse;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use mindwell_core::models::{
    AssessmentRecord, AssessmentSummary, ChatRecord, CognitiveRecord, MoodRecord,
};
use tracing::debug;
use uuid::Uuid;

use super::RecordStore;
use crate::errors::AppResult;

/// Records held in memory for the life of the process
///
/// Cloning shares the underlying maps.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    chats: Arc<DashMap<Uuid, Vec<ChatRecord>>>,
    assessments: Arc<DashMap<Uuid, Vec<AssessmentRecord>>>,
    moods: Arc<DashMap<(Uuid, NaiveDate), MoodRecord>>,
    cognitive: Arc<DashMap<Uuid, Vec<CognitiveRecord>>>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn append<T: Clone>(map: &DashMap<Uuid, Vec<T>>, user_id: Uuid, record: &T) {
        map.entry(user_id).or_default().push(record.clone());
    }

    fn snapshot<T: Clone>(map: &DashMap<Uuid, Vec<T>>, user_id: Uuid) -> Vec<T> {
        map.get(&user_id)
            .map(|records| records.value().clone())
            .unwrap_or_default()
    }

    fn newest_first<T: Clone>(
        map: &DashMap<Uuid, Vec<T>>,
        user_id: Uuid,
        created_at: impl Fn(&T) -> DateTime<Utc>,
    ) -> Vec<T> {
        let mut records = Self::snapshot(map, user_id);
        // Stable sort keeps insertion order among equal timestamps
        records.reverse();
        records.sort_by_key(|record| Reverse(created_at(record)));
        records
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn insert_chat(&self, record: &ChatRecord) -> AppResult<()> {
        Self::append(&self.chats, record.user_id, record);
        Ok(())
    }

    async fn chats_between(
        &self,
        user_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<ChatRecord>> {
        let mut records: Vec<_> = Self::snapshot(&self.chats, user_id)
            .into_iter()
            .filter(|chat| chat.created_at >= from && chat.created_at <= to)
            .collect();
        records.sort_by_key(|chat| chat.created_at);
        Ok(records)
    }

    async fn recent_chats(&self, user_id: Uuid, limit: usize) -> AppResult<Vec<ChatRecord>> {
        let mut records = Self::newest_first(&self.chats, user_id, |chat| chat.created_at);
        records.truncate(limit);
        Ok(records)
    }

    async fn count_chats(&self, user_id: Uuid) -> AppResult<usize> {
        Ok(self.chats.get(&user_id).map_or(0, |records| records.len()))
    }

    async fn insert_assessment(&self, record: &AssessmentRecord) -> AppResult<()> {
        Self::append(&self.assessments, record.user_id, record);
        Ok(())
    }

    async fn latest_assessment(&self, user_id: Uuid) -> AppResult<Option<AssessmentRecord>> {
        Ok(
            Self::newest_first(&self.assessments, user_id, |record| record.created_at)
                .into_iter()
                .next(),
        )
    }

    async fn recent_assessments(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> AppResult<Vec<AssessmentSummary>> {
        Ok(
            Self::newest_first(&self.assessments, user_id, |record| record.created_at)
                .iter()
                .take(limit)
                .map(AssessmentSummary::from)
                .collect(),
        )
    }

    async fn count_assessments(&self, user_id: Uuid) -> AppResult<usize> {
        Ok(self
            .assessments
            .get(&user_id)
            .map_or(0, |records| records.len()))
    }

    async fn upsert_mood(&self, record: MoodRecord) -> AppResult<MoodRecord> {
        let stored = match self.moods.entry((record.user_id, record.date)) {
            Entry::Occupied(mut existing) => {
                let current = existing.get_mut();
                current.score = record.score;
                current.note = record.note;
                debug!(user.id = %record.user_id, mood.date = %record.date, "Replaced mood entry");
                current.clone()
            }
            Entry::Vacant(slot) => slot.insert(record).value().clone(),
        };
        Ok(stored)
    }

    async fn moods_between(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<MoodRecord>> {
        let mut records: Vec<_> = self
            .moods
            .iter()
            .filter(|entry| {
                let (owner, date) = *entry.key();
                owner == user_id && date >= from && date <= to
            })
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|mood| mood.date);
        Ok(records)
    }

    async fn all_moods(&self, user_id: Uuid) -> AppResult<Vec<MoodRecord>> {
        self.moods_between(user_id, NaiveDate::MIN, NaiveDate::MAX)
            .await
    }

    async fn insert_cognitive(&self, record: &CognitiveRecord) -> AppResult<()> {
        Self::append(&self.cognitive, record.user_id, record);
        Ok(())
    }

    async fn cognitive_records(&self, user_id: Uuid) -> AppResult<Vec<CognitiveRecord>> {
        let mut records = Self::snapshot(&self.cognitive, user_id);
        records.sort_by_key(|record| record.created_at);
        Ok(records)
    }
}
