// ABOUTME: Domain constants grouped by concern: thresholds, windows, deadlines, and fixed texts
// ABOUTME: Pure data with no logic so the engines and the LLM layer agree on every number
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! Constants organized by domain.

/// Service identity used in structured logs
pub mod service_names {
    /// Name of the companion backend service
    pub const MINDWELL_SERVER: &str = "mindwell-server";
}

/// PHQ-9 questionnaire shape and severity thresholds
pub mod assessment {
    /// Number of questions in the questionnaire
    pub const QUESTION_COUNT: usize = 9;
    /// Highest score a single answer may carry
    pub const MAX_ANSWER: i64 = 3;
    /// Index of the self-harm question
    pub const SELF_HARM_QUESTION_INDEX: usize = 8;
    /// Upper bound (inclusive) of the minimal band
    pub const MINIMAL_MAX: i64 = 4;
    /// Upper bound (inclusive) of the mild band
    pub const MILD_MAX: i64 = 9;
    /// Upper bound (inclusive) of the moderate band
    pub const MODERATE_MAX: i64 = 14;
    /// Upper bound (inclusive) of the moderately severe band
    pub const MODERATELY_SEVERE_MAX: i64 = 19;
}

/// Mood and cognitive-exercise value ranges
pub mod ranges {
    /// Lowest permitted mood score
    pub const MOOD_MIN: i64 = 1;
    /// Highest permitted mood score
    pub const MOOD_MAX: i64 = 5;
    /// Lowest permitted intensity or feeling rating
    pub const RATING_MIN: i64 = 0;
    /// Highest permitted intensity or feeling rating
    pub const RATING_MAX: i64 = 100;
}

/// Windows and limits used when reading history
pub mod windows {
    /// Number of context messages forwarded to a provider
    pub const CONTEXT_MESSAGES: usize = 5;
    /// Days covered by the report's recent window
    pub const REPORT_DAYS: i64 = 7;
    /// Assessments used for the assessment trend
    pub const ASSESSMENT_TREND_COUNT: usize = 3;
    /// Default page size for chat history
    pub const CHAT_HISTORY_LIMIT: usize = 50;
    /// Default day span for mood history and summaries
    pub const MOOD_HISTORY_DAYS: i64 = 7;
    /// Most common cognitive situations reported
    pub const COMMON_SITUATIONS: usize = 3;
    /// Characters of a situation used as its grouping key
    pub const SITUATION_KEY_CHARS: usize = 50;
    /// Top concern categories reported
    pub const TOP_CONCERNS: usize = 5;
}

/// Rule thresholds for analytics and recommendations
pub mod thresholds {
    /// Mean difference beyond which a mood trend is not stable
    pub const TREND_DELTA: f64 = 0.5;
    /// Total difference beyond which assessments are not stable
    pub const ASSESSMENT_DELTA: i64 = 2;
    /// Variance below which moods are very consistent
    pub const VARIANCE_VERY_CONSISTENT: f64 = 0.5;
    /// Variance below which moods are consistent
    pub const VARIANCE_CONSISTENT: f64 = 1.0;
    /// Variance below which moods are variable
    pub const VARIANCE_VARIABLE: f64 = 2.0;
    /// Sessions needed for high engagement
    pub const ENGAGEMENT_HIGH: usize = 5;
    /// Sessions needed for medium engagement
    pub const ENGAGEMENT_MEDIUM: usize = 2;
    /// Mood average treated as low
    pub const LOW_MOOD: f64 = 2.5;
    /// Total above which a professional consultation is advised
    pub const CONSULT_TOTAL: i64 = 14;
    /// Total above which professional support is suggested
    pub const SUPPORT_TOTAL: i64 = 9;
    /// Total above which an appointment is the next step
    pub const APPOINTMENT_TOTAL: i64 = 10;
    /// Recent chats below which engagement is encouraged
    pub const SUPPORT_CHATS: usize = 2;
    /// Recent chats below which the engagement next step applies
    pub const ENGAGEMENT_CHATS: usize = 3;
    /// Cognitive improvement counted as strong progress
    pub const COGNITIVE_PROGRESS: f64 = 10.0;
    /// Recent cognitive exercises worth a pattern review
    pub const COGNITIVE_REVIEW_COUNT: usize = 3;
    /// Maximum recommendations in a report
    pub const MAX_RECOMMENDATIONS: usize = 5;
    /// Maximum next steps in a report
    pub const MAX_NEXT_STEPS: usize = 4;
}

/// Network deadlines
pub mod timeouts {
    /// Deadline for a generation call
    pub const GENERATION_SECS: u64 = 30;
    /// Deadline for a liveness probe
    pub const LIVENESS_SECS: u64 = 5;
    /// TCP connect deadline for provider clients
    pub const CONNECT_SECS: u64 = 5;
    /// Spacing between startup readiness attempts
    pub const READINESS_INTERVAL_SECS: u64 = 2;
    /// Readiness attempts made at startup
    pub const READINESS_ATTEMPTS: u32 = 3;
}

/// Fixed user-facing texts
pub mod messages {
    /// Reply when the provider took too long
    pub const FALLBACK_TIMEOUT: &str =
        "I apologize, but I'm taking too long to respond. Please try again.";
    /// Reply when the provider could not be reached
    pub const FALLBACK_CONNECTION: &str =
        "I apologize, but I'm having trouble connecting. Please make sure the AI service is running.";
    /// Reply when the provider returned an error status
    pub const FALLBACK_PROVIDER: &str =
        "I apologize, but I'm having trouble responding right now. Please try again later.";
    /// Reply for every other failure
    pub const FALLBACK_GENERIC: &str = "I apologize, but something went wrong. Please try again.";
    /// Reply when the provider is known to be unavailable before calling it
    pub const PROVIDER_UNAVAILABLE: &str = "I'm currently unavailable. Please try again later or contact a mental health professional if you need immediate support.";
    /// Narrative used when report insights cannot be generated
    pub const INSIGHTS_UNAVAILABLE: &str = "AI insights unavailable at this time.";
    /// Validation message for mood scores
    pub const MOOD_SCORE_RANGE: &str = "Score must be between 1 and 5";
    /// Validation message for answer vectors
    pub const ANSWER_COUNT: &str = "Must provide exactly 9 answers";
    /// Validation message for empty chat input
    pub const MESSAGE_REQUIRED: &str = "Message is required";
}
