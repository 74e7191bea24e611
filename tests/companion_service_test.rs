// ABOUTME: Integration tests for the companion service operations
// ABOUTME: Drives chat, assessment, mood, cognitive, and report flows against a mock Ollama server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::{Duration, Utc};
use common::{
    cognitive_draft, companion, live_ollama, ollama_config, request_bodies, router,
    UNREACHABLE_URL,
};
use mindwell_server::constants::messages;
use mindwell_server::errors::{ErrorCode, ErrorKind};
use mindwell_server::services::SummaryTrend;
use mindwell_server::store::RecordStore;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_persists_generated_reply() {
    let server = live_ollama("That sounds hard. What helps you relax?").await;
    let (service, store) = companion(router(ollama_config(&server.uri())));
    let user = Uuid::new_v4();

    let reply = service.chat(user, "  I'm feeling anxious  ").await.unwrap();

    assert!(reply.generated);
    assert_eq!(reply.error_kind, None);
    assert_eq!(reply.record.message, "I'm feeling anxious");
    assert_eq!(reply.record.response, "That sounds hard. What helps you relax?");
    assert_eq!(store.count_chats(user).await.unwrap(), 1);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let (service, store) = companion(router(ollama_config(UNREACHABLE_URL)));
    let user = Uuid::new_v4();

    let error = service.chat(user, "   ").await.unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(error.message, messages::MESSAGE_REQUIRED);
    assert_eq!(store.count_chats(user).await.unwrap(), 0);
}

#[tokio::test]
async fn test_unavailable_provider_stores_notice() {
    let (service, store) = companion(router(ollama_config(UNREACHABLE_URL)));
    let user = Uuid::new_v4();

    let reply = service.chat(user, "hello").await.unwrap();

    assert!(!reply.generated);
    assert_eq!(reply.record.response, messages::PROVIDER_UNAVAILABLE);
    let history = store.recent_chats(user, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].response, messages::PROVIDER_UNAVAILABLE);
}

#[tokio::test]
async fn test_failed_generation_stores_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
        .mount(&server)
        .await;
    let (service, store) = companion(router(ollama_config(&server.uri())));
    let user = Uuid::new_v4();

    let reply = service.chat(user, "hello").await.unwrap();

    assert!(!reply.generated);
    assert_eq!(reply.error_kind, Some(ErrorKind::Provider));
    assert_eq!(reply.record.response, messages::FALLBACK_PROVIDER);
    assert_eq!(store.count_chats(user).await.unwrap(), 1);
}

#[tokio::test]
async fn test_previous_exchanges_are_sent_as_context() {
    let server = live_ollama("I hear you.").await;
    let (service, _) = companion(router(ollama_config(&server.uri())));
    let user = Uuid::new_v4();

    service.chat(user, "first").await.unwrap();
    service.chat(user, "second").await.unwrap();
    service.chat(user, "third").await.unwrap();

    let bodies = request_bodies(&server, "/api/chat").await;
    assert_eq!(bodies.len(), 3);
    let first_call = bodies[0]["messages"].as_array().unwrap();
    assert_eq!(first_call.len(), 2);

    let last_call = bodies[2]["messages"].as_array().unwrap();
    let turns: Vec<(&str, &str)> = last_call
        .iter()
        .skip(1)
        .map(|m| (m["role"].as_str().unwrap(), m["content"].as_str().unwrap()))
        .collect();
    assert_eq!(last_call[0]["role"], "system");
    assert_eq!(
        turns,
        [
            ("user", "first"),
            ("assistant", "I hear you."),
            ("user", "second"),
            ("assistant", "I hear you."),
            ("user", "third"),
        ]
    );
}

#[tokio::test]
async fn test_chat_history_newest_first() {
    let (service, _) = companion(router(ollama_config(UNREACHABLE_URL)));
    let user = Uuid::new_v4();
    for text in ["one", "two", "three"] {
        service.chat(user, text).await.unwrap();
    }

    let history = service.chat_history(user, Some(2)).await.unwrap();
    let texts: Vec<_> = history.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(texts, ["three", "two"]);
    assert_eq!(service.chat_history(user, None).await.unwrap().len(), 3);
}

// ============================================================================
// Assessments
// ============================================================================

#[tokio::test]
async fn test_submit_and_fetch_latest_assessment() {
    let (service, _) = companion(router(ollama_config(UNREACHABLE_URL)));
    let user = Uuid::new_v4();

    let error = service.latest_assessment(user).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ResourceNotFound);
    assert_eq!(error.message, "Assessment not found");

    let saved = service
        .submit_assessment(user, &[2, 2, 2, 2, 2, 1, 1, 1, 1])
        .await
        .unwrap();
    assert_eq!(saved.outcome.total, 14);
    assert!(saved.outcome.crisis);

    let latest = service.latest_assessment(user).await.unwrap();
    assert_eq!(latest.id, saved.id);
}

#[tokio::test]
async fn test_malformed_assessment_is_not_stored() {
    let (service, store) = companion(router(ollama_config(UNREACHABLE_URL)));
    let user = Uuid::new_v4();

    assert!(service.submit_assessment(user, &[1, 2, 3]).await.is_err());
    assert!(service.submit_assessment(user, &[4; 9]).await.is_err());
    assert_eq!(store.count_assessments(user).await.unwrap(), 0);
}

// ============================================================================
// Mood
// ============================================================================

#[tokio::test]
async fn test_record_mood_replaces_same_day() {
    let (service, _) = companion(router(ollama_config(UNREACHABLE_URL)));
    let user = Uuid::new_v4();

    service.record_mood(user, 2, "rough morning", None).await.unwrap();
    let updated = service.record_mood(user, 4, "better evening", None).await.unwrap();

    let history = service.mood_history(user, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score, 4);
    assert_eq!(updated.note, "better evening");

    let error = service.record_mood(user, 6, "", None).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
    assert_eq!(error.message, messages::MOOD_SCORE_RANGE);
}

#[tokio::test]
async fn test_mood_summary() {
    let (service, _) = companion(router(ollama_config(UNREACHABLE_URL)));
    let user = Uuid::new_v4();

    let empty = service.mood_summary(user, None).await.unwrap();
    assert_eq!(empty.count, 0);
    assert_eq!(empty.average, None);
    assert_eq!(empty.trend, SummaryTrend::NoData);

    let today = Utc::now().date_naive();
    for (offset, score) in [(3, 1), (2, 2), (1, 4), (0, 5)] {
        service
            .record_mood(user, score, "", Some(today - Duration::days(offset)))
            .await
            .unwrap();
    }
    service
        .record_mood(user, 1, "", Some(today - Duration::days(30)))
        .await
        .unwrap();

    let summary = service.mood_summary(user, None).await.unwrap();
    assert_eq!(summary.count, 4);
    assert_eq!(summary.average, Some(3.0));
    assert_eq!(summary.trend, SummaryTrend::Improving);

    let single = service.mood_summary(user, Some(1)).await.unwrap();
    assert_eq!(single.count, 2);
}

// ============================================================================
// Cognitive Exercises and Reports
// ============================================================================

#[tokio::test]
async fn test_cognitive_record_validation() {
    let (service, store) = companion(router(ollama_config(UNREACHABLE_URL)));
    let user = Uuid::new_v4();

    let saved = service
        .save_cognitive_record(user, cognitive_draft("Presentation at work", 70, 40))
        .await
        .unwrap();
    assert_eq!(saved.improvement(), -30);

    let error = service
        .save_cognitive_record(user, cognitive_draft("Presentation at work", 150, 40))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
    assert!(error.message.contains("beforeFeeling"));

    assert_eq!(store.cognitive_records(user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_compose_report_through_service() {
    let server = live_ollama("Keep going, you're doing well.").await;
    let (service, _) = companion(router(ollama_config(&server.uri())));
    let user = Uuid::new_v4();

    service.record_mood(user, 4, "", None).await.unwrap();
    service
        .submit_assessment(user, &[0, 0, 1, 0, 0, 1, 0, 0, 0])
        .await
        .unwrap();

    let report = service.compose_report(user).await.unwrap();

    assert_eq!(report.summary.total_days_tracked, 1);
    assert_eq!(report.summary.assessment_count, 1);
    assert!(report.ai_insights.available);
    assert_eq!(report.ai_insights.summary, "Keep going, you're doing well.");
}
