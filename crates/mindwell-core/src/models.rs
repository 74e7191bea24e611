// ABOUTME: Record models for moods, assessments, chats, and cognitive exercises
// ABOUTME: Includes severity, risk, and priority enums shared by the engines and the report
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Record Models
//!
//! Records are created once and never mutated by the core. Mood entries are
//! the single exception at the store level: a second write for the same
//! `(user_id, date)` replaces the first.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

use crate::constants::{assessment, messages, ranges};
use crate::errors::{AppError, AppResult};

// ============================================================================
// Shared Enums
// ============================================================================

/// PHQ-9 severity band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityLevel {
    /// Total 0-4
    #[serde(rename = "minimal")]
    Minimal,
    /// Total 5-9
    #[serde(rename = "mild")]
    Mild,
    /// Total 10-14
    #[serde(rename = "moderate")]
    Moderate,
    /// Total 15-19
    #[serde(rename = "moderately severe")]
    ModeratelySevere,
    /// Total 20 and above
    #[serde(rename = "severe")]
    Severe,
}

impl SeverityLevel {
    /// Map a questionnaire total onto its band
    #[must_use]
    pub const fn from_total(total: i64) -> Self {
        if total <= assessment::MINIMAL_MAX {
            Self::Minimal
        } else if total <= assessment::MILD_MAX {
            Self::Mild
        } else if total <= assessment::MODERATE_MAX {
            Self::Moderate
        } else if total <= assessment::MODERATELY_SEVERE_MAX {
            Self::ModeratelySevere
        } else {
            Self::Severe
        }
    }

    /// Label used in reports and responses
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Mild => "mild",
            Self::Moderate => "moderate",
            Self::ModeratelySevere => "moderately severe",
            Self::Severe => "severe",
        }
    }
}

impl Display for SeverityLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk attached to a scored assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Self-care is appropriate
    Low,
    /// Professional support may help
    Medium,
    /// Professional support is strongly advised
    High,
}

/// Priority of a recommendation or urgency of a next step
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Nice to have
    Low,
    /// Worth doing soon
    Medium,
    /// Do first
    High,
}

// ============================================================================
// Mood
// ============================================================================

/// One mood check-in; unique per user and calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodRecord {
    /// Record identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Calendar day the mood applies to
    pub date: NaiveDate,
    /// Score in 1..=5
    pub score: u8,
    /// Free-text note
    pub note: String,
    /// When the record was written
    pub created_at: DateTime<Utc>,
}

impl MoodRecord {
    /// Validate and build a mood record
    ///
    /// # Errors
    ///
    /// Returns a `ValueOutOfRange` error when `score` is outside 1..=5.
    pub fn new(user_id: Uuid, date: NaiveDate, score: i64, note: impl Into<String>) -> AppResult<Self> {
        if !(ranges::MOOD_MIN..=ranges::MOOD_MAX).contains(&score) {
            return Err(AppError::value_out_of_range(messages::MOOD_SCORE_RANGE));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            score: score as u8,
            note: note.into(),
            created_at: Utc::now(),
        })
    }
}

// ============================================================================
// Assessment
// ============================================================================

/// Deterministic result of scoring a questionnaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentOutcome {
    /// Validated answers
    pub answers: [u8; assessment::QUESTION_COUNT],
    /// Sum of answers
    pub total: i64,
    /// Severity band of `total`
    pub level: SeverityLevel,
    /// Whether the self-harm question was answered above zero
    pub crisis: bool,
    /// Narrative summary for the band
    pub summary: String,
    /// Ordered recommendations for the band
    pub recommendations: Vec<String>,
    /// Risk for the band, forced high on crisis
    pub risk_level: RiskLevel,
}

/// A persisted questionnaire submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    /// Record identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Scoring result
    #[serde(flatten)]
    pub outcome: AssessmentOutcome,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl AssessmentRecord {
    /// Wrap a scoring result for persistence
    #[must_use]
    pub fn new(user_id: Uuid, outcome: AssessmentOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            outcome,
            created_at: Utc::now(),
        }
    }
}

/// The single shape in which the store returns assessment history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSummary {
    /// Questionnaire total
    pub total: i64,
    /// Severity band
    pub level: SeverityLevel,
    /// Crisis flag
    pub crisis: bool,
    /// Submission time
    pub created_at: DateTime<Utc>,
}

impl From<&AssessmentRecord> for AssessmentSummary {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            total: record.outcome.total,
            level: record.outcome.level,
            crisis: record.outcome.crisis,
            created_at: record.created_at,
        }
    }
}

// ============================================================================
// Chat
// ============================================================================

/// One exchange with the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRecord {
    /// Record identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// What the user wrote
    pub message: String,
    /// What the assistant answered (possibly a fallback text)
    pub response: String,
    /// Exchange time
    pub created_at: DateTime<Utc>,
}

impl ChatRecord {
    /// Build a chat record stamped now
    #[must_use]
    pub fn new(user_id: Uuid, message: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            message: message.into(),
            response: response.into(),
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Cognitive Restructuring
// ============================================================================

/// Caller-supplied fields of a cognitive restructuring exercise
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CognitiveDraft {
    /// Triggering situation
    pub situation: String,
    /// Thought that came up
    pub automatic_thought: String,
    /// Emotion intensity 0..=100
    pub emotion_intensity: i64,
    /// Evidence considered
    pub evidence: String,
    /// Balanced alternative thought
    pub alternative: String,
    /// Intensity after re-rating 0..=100
    pub re_rate: i64,
    /// Feeling before the exercise 0..=100
    pub before_feeling: i64,
    /// Feeling after the exercise 0..=100
    pub after_feeling: i64,
}

/// A persisted cognitive restructuring exercise
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitiveRecord {
    /// Record identifier
    pub id: Uuid,
    /// Owner
    pub user_id: Uuid,
    /// Triggering situation
    pub situation: String,
    /// Thought that came up
    pub automatic_thought: String,
    /// Emotion intensity 0..=100
    pub emotion_intensity: u8,
    /// Evidence considered
    pub evidence: String,
    /// Balanced alternative thought
    pub alternative: String,
    /// Intensity after re-rating 0..=100
    pub re_rate: u8,
    /// Feeling before the exercise 0..=100
    pub before_feeling: u8,
    /// Feeling after the exercise 0..=100
    pub after_feeling: u8,
    /// Completion time
    pub created_at: DateTime<Utc>,
}

impl CognitiveRecord {
    /// Validate a draft and build the record
    ///
    /// # Errors
    ///
    /// Returns a `ValueOutOfRange` error naming the first rating outside 0..=100.
    pub fn new(user_id: Uuid, draft: CognitiveDraft) -> AppResult<Self> {
        let rating = |name: &str, value: i64| -> AppResult<u8> {
            if (ranges::RATING_MIN..=ranges::RATING_MAX).contains(&value) {
                Ok(value as u8)
            } else {
                Err(AppError::value_out_of_range(format!(
                    "{name} must be between {} and {}",
                    ranges::RATING_MIN,
                    ranges::RATING_MAX
                )))
            }
        };

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            emotion_intensity: rating("emotionIntensity", draft.emotion_intensity)?,
            re_rate: rating("reRate", draft.re_rate)?,
            before_feeling: rating("beforeFeeling", draft.before_feeling)?,
            after_feeling: rating("afterFeeling", draft.after_feeling)?,
            situation: draft.situation,
            automatic_thought: draft.automatic_thought,
            evidence: draft.evidence,
            alternative: draft.alternative,
            created_at: Utc::now(),
        })
    }

    /// Change in feeling produced by the exercise
    #[must_use]
    pub fn improvement(&self) -> i64 {
        i64::from(self.after_feeling) - i64::from(self.before_feeling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_total_is_monotonic() {
        let levels: Vec<SeverityLevel> = (0..=27).map(SeverityLevel::from_total).collect();
        assert!(levels.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(levels[0], SeverityLevel::Minimal);
        assert_eq!(levels[27], SeverityLevel::Severe);
    }

    #[test]
    fn test_severity_serializes_with_space() {
        let json = serde_json::to_string(&SeverityLevel::ModeratelySevere).unwrap();
        assert_eq!(json, "\"moderately severe\"");
    }

    #[test]
    fn test_mood_score_bounds() {
        let user = Uuid::new_v4();
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();

        assert!(MoodRecord::new(user, day, 1, "").is_ok());
        assert!(MoodRecord::new(user, day, 5, "").is_ok());

        let error = MoodRecord::new(user, day, 6, "").unwrap_err();
        assert_eq!(error.message, "Score must be between 1 and 5");
        assert!(MoodRecord::new(user, day, 0, "").is_err());
    }

    #[test]
    fn test_cognitive_rating_validation() {
        let draft = CognitiveDraft {
            situation: "Meeting".into(),
            automatic_thought: "I will fail".into(),
            emotion_intensity: 80,
            evidence: "Prepared well".into(),
            alternative: "I can handle it".into(),
            re_rate: 40,
            before_feeling: 30,
            after_feeling: 55,
        };

        let record = CognitiveRecord::new(Uuid::new_v4(), draft.clone()).unwrap();
        assert_eq!(record.improvement(), 25);

        let invalid = CognitiveDraft {
            after_feeling: 101,
            ..draft
        };
        let error = CognitiveRecord::new(Uuid::new_v4(), invalid).unwrap_err();
        assert!(error.message.starts_with("afterFeeling"));
    }
}
