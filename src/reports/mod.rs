// ABOUTME: Composes the personal wellbeing report from stored history, analytics, and an optional narrative
// ABOUTME: Every analytic slice degrades to an explicit marker on its own; the narrative call never fails the report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Report Composition
//!
//! A report is built fresh on every request and never stored. Recent
//! counts and the mood series use a seven-day window; assessment and
//! cognitive trends use the full history.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use mindwell_core::constants::{messages, windows};
use mindwell_core::models::{AssessmentSummary, CognitiveRecord, MoodRecord, SeverityLevel};
use mindwell_intelligence::{
    AnalyticsAggregator, AssessmentImprovement, Concern, Consistency, Engagement, NextStep,
    Recommendation, RecommendationContext, RecommendationEngine, Trend, Wellbeing,
};
use serde::Serialize;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::errors::AppResult;
use crate::llm::prompts::{build_insights_prompt, InsightCounts};
use crate::llm::ProviderRouter;
use crate::logging::AppLogger;
use crate::store::RecordStore;

// ============================================================================
// Report Types
// ============================================================================

/// Complete personal report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// When the report was built
    pub generated_at: DateTime<Utc>,
    /// Window used for the recent figures
    pub period: ReportPeriod,
    /// Headline figures
    pub summary: ReportSummary,
    /// Mood slice
    pub mood_analysis: MoodAnalysis,
    /// Assessment slice
    pub assessment_analysis: AssessmentAnalysis,
    /// Chat slice
    pub chat_analysis: ChatAnalysis,
    /// Cognitive exercise slice
    pub cognitive_analysis: CognitiveAnalysis,
    /// Ranked recommendations
    pub recommendations: Vec<Recommendation>,
    /// Best-effort narrative
    pub ai_insights: AiInsights,
    /// Ranked next steps
    pub next_steps: Vec<NextStep>,
}

/// Start and end of the recent window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportPeriod {
    /// Window start
    pub start: DateTime<Utc>,
    /// Window end
    pub end: DateTime<Utc>,
}

/// Headline figures
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Days with a mood entry, all time
    pub total_days_tracked: usize,
    /// Mean mood over the recent window
    pub recent_mood_average: Option<f64>,
    /// Assessments completed, all time
    pub assessment_count: usize,
    /// Chat sessions in the recent window
    pub chat_sessions: usize,
    /// Cognitive exercises completed, all time
    pub cognitive_records: usize,
    /// Label from the latest assessment
    pub overall_wellbeing: Wellbeing,
}

/// Mood slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodAnalysis {
    /// Mean mood over the recent window
    pub average_score: Option<f64>,
    /// Direction of the recent series
    pub trend: Trend,
    /// Spread of the recent series
    pub consistency: Consistency,
    /// Date of the highest mood ever logged
    pub best_day: Option<NaiveDate>,
    /// Date of the lowest mood ever logged
    pub challenging_day: Option<NaiveDate>,
}

/// Assessment slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentAnalysis {
    /// Total of the latest assessment
    pub latest_score: Option<i64>,
    /// Band of the latest assessment
    pub latest_level: Option<SeverityLevel>,
    /// Whether the latest assessment flagged crisis
    pub crisis_detected: bool,
    /// Totals of the latest assessments, newest first; empty with fewer than two
    pub trend: Vec<i64>,
    /// Direction of those totals
    pub improvement: AssessmentImprovement,
}

/// Concern category with its hit count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConcernCount {
    /// Category
    pub concern: Concern,
    /// Messages mentioning it
    pub count: usize,
}

/// Chat slice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatAnalysis {
    /// Sessions, all time
    pub total_sessions: usize,
    /// Sessions in the recent window
    pub recent_sessions: usize,
    /// Label from the recent count
    pub engagement_level: Engagement,
    /// Most mentioned concern categories across all messages
    pub top_concerns: Vec<ConcernCount>,
}

/// Situation with how often it recurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SituationCount {
    /// Normalized situation prefix
    pub situation: String,
    /// Exercises sharing it
    pub count: usize,
}

/// Cognitive exercise slice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CognitiveAnalysis {
    /// Exercises, all time
    pub total_records: usize,
    /// Exercises in the recent window
    pub recent_records: usize,
    /// Mean feeling change, all time
    pub average_improvement: Option<f64>,
    /// Most frequent situations
    pub common_situations: Vec<SituationCount>,
}

/// Narrative section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiInsights {
    /// Narrative text, or the unavailable notice
    pub summary: String,
    /// When the narrative was produced
    pub generated_at: Option<DateTime<Utc>>,
    /// Whether `summary` came from the provider
    pub available: bool,
}

impl AiInsights {
    fn unavailable() -> Self {
        Self {
            summary: messages::INSIGHTS_UNAVAILABLE.to_owned(),
            generated_at: None,
            available: false,
        }
    }
}

// ============================================================================
// Composer
// ============================================================================

/// Builds reports from a record store and, optionally, a narrative provider
#[derive(Clone)]
pub struct ReportComposer {
    store: Arc<dyn RecordStore>,
    router: Option<Arc<ProviderRouter>>,
    engine: RecommendationEngine,
}

impl ReportComposer {
    /// Composer that also requests a narrative from `router`
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, router: Option<Arc<ProviderRouter>>) -> Self {
        Self {
            store,
            router,
            engine: RecommendationEngine::new(),
        }
    }

    /// Replace the recommendation engine
    #[must_use]
    pub fn with_engine(mut self, engine: RecommendationEngine) -> Self {
        self.engine = engine;
        self
    }

    /// Build the report for `user_id` as of now
    ///
    /// # Errors
    ///
    /// Store read failures degrade the affected slice instead of failing;
    /// the `Result` is kept for callers that compose through the service.
    pub async fn compose(&self, user_id: Uuid) -> AppResult<Report> {
        self.compose_at(user_id, Utc::now()).await
    }

    /// Build the report for `user_id` as of `now`
    ///
    /// # Errors
    ///
    /// Currently never fails; a failed store read leaves its slice empty.
    #[instrument(skip(self), fields(user.id = %user_id))]
    pub async fn compose_at(&self, user_id: Uuid, now: DateTime<Utc>) -> AppResult<Report> {
        let window_start = now - Duration::days(windows::REPORT_DAYS);
        let history = History::load(self.store.as_ref(), user_id, window_start, now).await;

        let mood_samples: Vec<f64> = history
            .recent_moods
            .iter()
            .map(|mood| f64::from(mood.score))
            .collect();
        let mood_average = AnalyticsAggregator::average(&mood_samples);

        let latest = history.assessments.first().copied();
        let assessment_trend: Vec<i64> = if history.assessments.len() >= 2 {
            history.assessments.iter().map(|a| a.total).collect()
        } else {
            Vec::new()
        };

        let recent_cognitive: Vec<CognitiveRecord> = history
            .cognitive
            .iter()
            .filter(|record| record.created_at >= window_start)
            .cloned()
            .collect();

        let context = RecommendationContext {
            latest_assessment: latest,
            mood_average,
            recent_chats: history.recent_chats,
            recent_cognitive: recent_cognitive.len(),
            recent_cognitive_improvement: AnalyticsAggregator::cognitive_average_improvement(
                &recent_cognitive,
            ),
        };

        let cognitive_improvement =
            AnalyticsAggregator::cognitive_average_improvement(&history.cognitive);
        let ai_insights = self
            .narrative(
                &InsightCounts {
                    mood_entries: history.all_moods.len(),
                    assessments: history.assessment_count,
                    chat_sessions: history.chat_messages.len(),
                    cognitive_records: history.cognitive.len(),
                    cognitive_improvement,
                },
                now,
            )
            .await;

        let report = Report {
            generated_at: now,
            period: ReportPeriod {
                start: window_start,
                end: now,
            },
            summary: ReportSummary {
                total_days_tracked: history.all_moods.len(),
                recent_mood_average: mood_average,
                assessment_count: history.assessment_count,
                chat_sessions: history.recent_chats,
                cognitive_records: history.cognitive.len(),
                overall_wellbeing: AnalyticsAggregator::wellbeing(latest.as_ref()),
            },
            mood_analysis: MoodAnalysis {
                average_score: mood_average,
                trend: AnalyticsAggregator::trend(&mood_samples),
                consistency: AnalyticsAggregator::consistency(&mood_samples),
                best_day: AnalyticsAggregator::best_day(&history.all_moods),
                challenging_day: AnalyticsAggregator::challenging_day(&history.all_moods),
            },
            assessment_analysis: AssessmentAnalysis {
                latest_score: latest.map(|a| a.total),
                latest_level: latest.map(|a| a.level),
                crisis_detected: latest.is_some_and(|a| a.crisis),
                improvement: AnalyticsAggregator::assessment_improvement(&assessment_trend),
                trend: assessment_trend,
            },
            chat_analysis: ChatAnalysis {
                total_sessions: history.chat_messages.len(),
                recent_sessions: history.recent_chats,
                engagement_level: AnalyticsAggregator::engagement(history.recent_chats),
                top_concerns: AnalyticsAggregator::top_concerns(
                    history.chat_messages.iter().map(String::as_str),
                )
                .into_iter()
                .map(|(concern, count)| ConcernCount { concern, count })
                .collect(),
            },
            cognitive_analysis: CognitiveAnalysis {
                total_records: history.cognitive.len(),
                recent_records: recent_cognitive.len(),
                average_improvement: cognitive_improvement,
                common_situations: AnalyticsAggregator::common_situations(&history.cognitive)
                    .into_iter()
                    .map(|(situation, count)| SituationCount { situation, count })
                    .collect(),
            },
            recommendations: self.engine.generate_recommendations(&context),
            ai_insights,
            next_steps: self.engine.generate_next_steps(&context),
        };

        AppLogger::log_report(
            user_id,
            report.recommendations.len(),
            report.ai_insights.available,
        );
        Ok(report)
    }

    async fn narrative(&self, counts: &InsightCounts, now: DateTime<Utc>) -> AiInsights {
        let Some(router) = &self.router else {
            return AiInsights::unavailable();
        };
        if !router.is_available().await {
            debug!("Provider not available; skipping report narrative");
            return AiInsights::unavailable();
        }

        let result = router.generate(&build_insights_prompt(counts), &[]).await;
        if result.success() {
            AiInsights {
                summary: result.into_text(),
                generated_at: Some(now),
                available: true,
            }
        } else {
            warn!(error_kind = ?result.error_kind(), "Report narrative failed");
            AiInsights::unavailable()
        }
    }
}

/// Everything one report reads from the store
struct History {
    recent_moods: Vec<MoodRecord>,
    all_moods: Vec<MoodRecord>,
    assessments: Vec<AssessmentSummary>,
    assessment_count: usize,
    recent_chats: usize,
    chat_messages: Vec<String>,
    cognitive: Vec<CognitiveRecord>,
}

impl History {
    /// Read every slice independently; a failed read leaves that slice empty
    async fn load(
        store: &dyn RecordStore,
        user_id: Uuid,
        window_start: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        let recent_moods = or_empty(
            "recent_moods",
            store
                .moods_between(user_id, window_start.date_naive(), now.date_naive())
                .await,
        );
        let all_moods = or_empty("all_moods", store.all_moods(user_id).await);
        let assessments = or_empty(
            "assessments",
            store
                .recent_assessments(user_id, windows::ASSESSMENT_TREND_COUNT)
                .await,
        );
        let assessment_count =
            or_empty("assessment_count", store.count_assessments(user_id).await);
        let recent_chats = or_empty(
            "recent_chats",
            store.chats_between(user_id, window_start, now).await,
        )
        .len();
        let chat_messages = match store.count_chats(user_id).await {
            Ok(total) => or_empty("chat_messages", store.recent_chats(user_id, total).await)
                .into_iter()
                .rev()
                .map(|chat| chat.message)
                .collect(),
            Err(error) => {
                warn!(slice = "chat_messages", %error, "Store read failed; slice left empty");
                Vec::new()
            }
        };
        let cognitive = or_empty("cognitive", store.cognitive_records(user_id).await);

        Self {
            recent_moods,
            all_moods,
            assessments,
            assessment_count,
            recent_chats,
            chat_messages,
            cognitive,
        }
    }
}

fn or_empty<T: Default>(slice: &'static str, result: AppResult<T>) -> T {
    result.unwrap_or_else(|error| {
        warn!(slice, %error, "Store read failed; slice left empty");
        T::default()
    })
}
