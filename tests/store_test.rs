// ABOUTME: Integration tests for the in-memory record store
// ABOUTME: Verifies ordering, per-user isolation, and per-day mood upsert semantics
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use mindwell_server::intelligence::score_assessment;
use mindwell_server::models::{AssessmentRecord, ChatRecord, MoodRecord};
use mindwell_server::store::{InMemoryStore, RecordStore};
use uuid::Uuid;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
}

fn chat_at(user: Uuid, text: &str, minutes_ago: i64) -> ChatRecord {
    let mut record = ChatRecord::new(user, text, "reply");
    record.created_at = Utc::now() - Duration::minutes(minutes_ago);
    record
}

// ============================================================================
// Moods
// ============================================================================

#[tokio::test]
async fn test_second_mood_for_same_day_replaces_first() {
    let store = InMemoryStore::new();
    let user = Uuid::new_v4();

    let first = store
        .upsert_mood(MoodRecord::new(user, day(3), 3, "meh").unwrap())
        .await
        .unwrap();
    let second = store
        .upsert_mood(MoodRecord::new(user, day(3), 5, "better").unwrap())
        .await
        .unwrap();

    let moods = store.all_moods(user).await.unwrap();
    assert_eq!(moods.len(), 1);
    assert_eq!(moods[0].score, 5);
    assert_eq!(moods[0].note, "better");
    assert_eq!(second.id, first.id);
}

#[tokio::test]
async fn test_concurrent_mood_writes_leave_one_entry() {
    let store = Arc::new(InMemoryStore::new());
    let user = Uuid::new_v4();

    let handles: Vec<_> = (1..=5)
        .map(|score| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .upsert_mood(MoodRecord::new(user, day(10), score, "").unwrap())
                    .await
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let moods = store.all_moods(user).await.unwrap();
    assert_eq!(moods.len(), 1);
    assert!((1..=5).contains(&moods[0].score));
}

#[tokio::test]
async fn test_moods_between_is_inclusive_and_ascending() {
    let store = InMemoryStore::new();
    let user = Uuid::new_v4();
    for (d, score) in [(5, 2), (1, 4), (3, 3), (7, 1)] {
        store
            .upsert_mood(MoodRecord::new(user, day(d), score, "").unwrap())
            .await
            .unwrap();
    }

    let moods = store.moods_between(user, day(1), day(5)).await.unwrap();
    let dates: Vec<_> = moods.iter().map(|m| m.date).collect();
    assert_eq!(dates, [day(1), day(3), day(5)]);
}

#[tokio::test]
async fn test_users_are_isolated() {
    let store = InMemoryStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    store
        .upsert_mood(MoodRecord::new(alice, day(1), 4, "").unwrap())
        .await
        .unwrap();
    store.insert_chat(&chat_at(alice, "hi", 0)).await.unwrap();

    assert!(store.all_moods(bob).await.unwrap().is_empty());
    assert_eq!(store.count_chats(bob).await.unwrap(), 0);
    assert!(store.latest_assessment(bob).await.unwrap().is_none());
}

// ============================================================================
// Chats and Assessments
// ============================================================================

#[tokio::test]
async fn test_recent_chats_newest_first_with_limit() {
    let store = InMemoryStore::new();
    let user = Uuid::new_v4();
    for (text, minutes_ago) in [("oldest", 30), ("middle", 20), ("newest", 10)] {
        store.insert_chat(&chat_at(user, text, minutes_ago)).await.unwrap();
    }

    let recent = store.recent_chats(user, 2).await.unwrap();
    let texts: Vec<_> = recent.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(texts, ["newest", "middle"]);
    assert_eq!(store.count_chats(user).await.unwrap(), 3);
}

#[tokio::test]
async fn test_chats_between_filters_window() {
    let store = InMemoryStore::new();
    let user = Uuid::new_v4();
    store.insert_chat(&chat_at(user, "old", 60 * 24 * 10)).await.unwrap();
    store.insert_chat(&chat_at(user, "recent", 60)).await.unwrap();

    let now = Utc::now();
    let window = store
        .chats_between(user, now - Duration::days(7), now)
        .await
        .unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].message, "recent");
}

#[tokio::test]
async fn test_latest_and_recent_assessments() {
    let store = InMemoryStore::new();
    let user = Uuid::new_v4();

    for (total_answer, hours_ago) in [(1, 3), (2, 2), (3, 1)] {
        let mut record =
            AssessmentRecord::new(user, score_assessment(&[total_answer; 9]).unwrap());
        record.created_at = Utc::now() - Duration::hours(hours_ago);
        store.insert_assessment(&record).await.unwrap();
    }

    let latest = store.latest_assessment(user).await.unwrap().unwrap();
    assert_eq!(latest.outcome.total, 27);

    let summaries = store.recent_assessments(user, 2).await.unwrap();
    let totals: Vec<_> = summaries.iter().map(|s| s.total).collect();
    assert_eq!(totals, [27, 18]);
    assert_eq!(store.count_assessments(user).await.unwrap(), 3);
}
