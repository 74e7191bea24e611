// ABOUTME: Companion service orchestrating chat, assessments, mood tracking, cognitive exercises, and reports
// ABOUTME: Validates caller input, calls the scorer and router, and persists records through the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use mindwell_core::constants::{messages, windows};
use mindwell_core::errors::ErrorKind;
use mindwell_core::models::{
    AssessmentRecord, ChatRecord, CognitiveDraft, CognitiveRecord, MoodRecord,
};
use mindwell_intelligence::{AnalyticsAggregator, AssessmentScorer, Trend};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::llm::{ChatMessage, ProviderRouter};
use crate::logging::{preview, AppLogger};
use crate::reports::{Report, ReportComposer};
use crate::store::RecordStore;

/// Reply to one chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    /// Persisted exchange
    pub record: ChatRecord,
    /// Whether the reply came from the provider
    pub generated: bool,
    /// Why it did not, when it did not
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

/// Mood summary trend; `no_data` when nothing was logged in the window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryTrend {
    /// No entries in the window
    NoData,
    /// Second half above first half
    Improving,
    /// Second half below first half
    Declining,
    /// Halves within tolerance
    Stable,
    /// A single entry
    InsufficientData,
}

impl From<Trend> for SummaryTrend {
    fn from(trend: Trend) -> Self {
        match trend {
            Trend::Improving => Self::Improving,
            Trend::Declining => Self::Declining,
            Trend::Stable => Self::Stable,
            Trend::InsufficientData => Self::InsufficientData,
        }
    }
}

/// Mood figures over a day window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodSummary {
    /// Mean score, absent without entries
    pub average: Option<f64>,
    /// Entries in the window
    pub count: usize,
    /// Direction of the window
    pub trend: SummaryTrend,
}

/// Entry point for the request-handling layer
#[derive(Clone)]
pub struct CompanionService {
    store: Arc<dyn RecordStore>,
    router: Arc<ProviderRouter>,
    scorer: AssessmentScorer,
    reports: ReportComposer,
}

impl CompanionService {
    /// Service over a store and a router; reports request narratives from the same router
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, router: Arc<ProviderRouter>) -> Self {
        let reports = ReportComposer::new(Arc::clone(&store), Some(Arc::clone(&router)));
        Self {
            store,
            router,
            scorer: AssessmentScorer::new(),
            reports,
        }
    }

    /// Router used for chat replies
    #[must_use]
    pub const fn router(&self) -> &Arc<ProviderRouter> {
        &self.router
    }

    // ================================
    // Chat
    // ================================

    /// Reply to a chat message and persist the exchange
    ///
    /// Provider failures do not fail the call: the fallback reply is stored
    /// and returned like any other.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank message, or a storage error.
    #[instrument(skip(self, message), fields(user.id = %user_id))]
    pub async fn chat(&self, user_id: Uuid, message: &str) -> AppResult<ChatReply> {
        let message = message.trim();
        if message.is_empty() {
            return Err(AppError::invalid_input(messages::MESSAGE_REQUIRED));
        }

        let (response, generated, error_kind) = if self.router.is_available().await {
            let context = self.conversation_context(user_id).await?;
            let result = self.router.generate(message, &context).await;
            let success = result.success();
            let kind = result.error_kind();
            (result.into_text(), success, kind)
        } else {
            warn!(message = %preview(message), "Provider unavailable; replying with notice");
            (messages::PROVIDER_UNAVAILABLE.to_owned(), false, None)
        };

        let record = ChatRecord::new(user_id, message, response);
        self.store.insert_chat(&record).await?;
        info!(generated, "Chat message saved");

        Ok(ChatReply {
            record,
            generated,
            error_kind,
        })
    }

    /// Earlier exchanges as alternating user and assistant turns, oldest first
    async fn conversation_context(&self, user_id: Uuid) -> AppResult<Vec<ChatMessage>> {
        let recent = self
            .store
            .recent_chats(user_id, windows::CONTEXT_MESSAGES)
            .await?;
        Ok(recent
            .into_iter()
            .rev()
            .flat_map(|chat| {
                [
                    ChatMessage::user(chat.message),
                    ChatMessage::assistant(chat.response),
                ]
            })
            .collect())
    }

    /// Most recent exchanges, newest first
    ///
    /// # Errors
    ///
    /// Returns a storage error if history cannot be read.
    pub async fn chat_history(&self, user_id: Uuid, limit: Option<usize>) -> AppResult<Vec<ChatRecord>> {
        self.store
            .recent_chats(user_id, limit.unwrap_or(windows::CHAT_HISTORY_LIMIT))
            .await
    }

    // ================================
    // Assessments
    // ================================

    /// Score and persist a questionnaire
    ///
    /// # Errors
    ///
    /// Returns a validation error for a malformed answer vector, or a storage error.
    pub async fn submit_assessment(&self, user_id: Uuid, answers: &[i64]) -> AppResult<AssessmentRecord> {
        let outcome = self.scorer.score(answers)?;
        let record = AssessmentRecord::new(user_id, outcome);
        self.store.insert_assessment(&record).await?;
        AppLogger::log_assessment(
            user_id,
            record.outcome.total,
            record.outcome.level.as_str(),
            record.outcome.crisis,
        );
        Ok(record)
    }

    /// Latest assessment
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the user has none, or a storage error.
    pub async fn latest_assessment(&self, user_id: Uuid) -> AppResult<AssessmentRecord> {
        self.store
            .latest_assessment(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Assessment"))
    }

    // ================================
    // Mood
    // ================================

    /// Record today's (or `date`'s) mood, replacing any entry for that day
    ///
    /// # Errors
    ///
    /// Returns a validation error when the score is outside 1 to 5, or a storage error.
    pub async fn record_mood(
        &self,
        user_id: Uuid,
        score: i64,
        note: &str,
        date: Option<NaiveDate>,
    ) -> AppResult<MoodRecord> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        let record = MoodRecord::new(user_id, date, score, note)?;
        let stored = self.store.upsert_mood(record).await?;
        AppLogger::log_mood_recorded(user_id, stored.date, stored.score);
        Ok(stored)
    }

    /// Mood entries over the last `days` days, oldest first
    ///
    /// # Errors
    ///
    /// Returns a storage error if history cannot be read.
    pub async fn mood_history(&self, user_id: Uuid, days: Option<i64>) -> AppResult<Vec<MoodRecord>> {
        let (from, to) = Self::day_window(Utc::now(), days);
        self.store.moods_between(user_id, from, to).await
    }

    /// Mean, count, and trend over the last `days` days
    ///
    /// # Errors
    ///
    /// Returns a storage error if history cannot be read.
    pub async fn mood_summary(&self, user_id: Uuid, days: Option<i64>) -> AppResult<MoodSummary> {
        let moods = self.mood_history(user_id, days).await?;
        if moods.is_empty() {
            return Ok(MoodSummary {
                average: None,
                count: 0,
                trend: SummaryTrend::NoData,
            });
        }

        let samples: Vec<f64> = moods.iter().map(|mood| f64::from(mood.score)).collect();
        Ok(MoodSummary {
            average: AnalyticsAggregator::average(&samples),
            count: samples.len(),
            trend: AnalyticsAggregator::trend(&samples).into(),
        })
    }

    fn day_window(now: DateTime<Utc>, days: Option<i64>) -> (NaiveDate, NaiveDate) {
        let days = days
            .filter(|d| *d > 0)
            .unwrap_or(windows::MOOD_HISTORY_DAYS);
        ((now - Duration::days(days)).date_naive(), now.date_naive())
    }

    // ================================
    // Cognitive exercises
    // ================================

    /// Validate and persist a cognitive restructuring exercise
    ///
    /// # Errors
    ///
    /// Returns a validation error when a rating is outside 0 to 100, or a storage error.
    pub async fn save_cognitive_record(
        &self,
        user_id: Uuid,
        draft: CognitiveDraft,
    ) -> AppResult<CognitiveRecord> {
        let record = CognitiveRecord::new(user_id, draft)?;
        self.store.insert_cognitive(&record).await?;
        info!(user.id = %user_id, improvement = record.improvement(), "Cognitive record saved");
        Ok(record)
    }

    // ================================
    // Reports
    // ================================

    /// Personal report as of now
    ///
    /// # Errors
    ///
    /// Returns a storage error if history cannot be read.
    pub async fn compose_report(&self, user_id: Uuid) -> AppResult<Report> {
        self.reports.compose(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_window_defaults_to_a_week() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let (from, to) = CompanionService::day_window(now, None);
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 3, 10).unwrap());

        let (from, _) = CompanionService::day_window(now, Some(-4));
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
    }

    #[test]
    fn test_summary_trend_serializes_snake_case() {
        let value = serde_json::to_value(SummaryTrend::from(Trend::InsufficientData)).unwrap();
        assert_eq!(value, "insufficient_data");
        assert_eq!(serde_json::to_value(SummaryTrend::NoData).unwrap(), "no_data");
    }
}
