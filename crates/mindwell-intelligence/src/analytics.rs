// ABOUTME: Analytics aggregator deriving trend, consistency, engagement, and wellbeing labels
// ABOUTME: Works on ascending time-ordered samples and free-text scans; empty input yields markers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Analytics Aggregator
//!
//! Every function here is total: an empty or too-short input produces an
//! explicit marker (`None` or `insufficient_data`) rather than a division
//! fault. Sample slices are expected oldest first.

use chrono::NaiveDate;
use mindwell_core::constants::{assessment, thresholds, windows};
use mindwell_core::models::{AssessmentSummary, CognitiveRecord, MoodRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Labels
// ============================================================================

/// Direction of a mood series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Later values are higher
    Improving,
    /// Later values are lower
    Declining,
    /// No meaningful change
    Stable,
    /// Fewer than two samples
    InsufficientData,
}

/// Direction of a PHQ-9 series, where a falling total is an improvement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentImprovement {
    /// Newest total is lower than the oldest by more than the tolerance
    Improving,
    /// Newest total is higher than the oldest by more than the tolerance
    Declining,
    /// Within tolerance
    Stable,
    /// Fewer than two assessments
    InsufficientData,
}

/// Spread of a mood series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    /// Variance below 0.5
    VeryConsistent,
    /// Variance below 1.0
    Consistent,
    /// Variance below 2.0
    Variable,
    /// Variance 2.0 or more
    HighlyVariable,
    /// Fewer than two samples
    InsufficientData,
}

/// How often the user talked to the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Engagement {
    /// Five or more sessions
    High,
    /// Two to four sessions
    Medium,
    /// One session
    Low,
    /// No sessions at all
    InsufficientData,
}

/// Overall wellbeing derived from the latest assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Wellbeing {
    /// Minimal band
    Good,
    /// Mild band
    Fair,
    /// Moderate band
    Concerning,
    /// Moderately severe band or worse
    Critical,
    /// No assessment on record
    Unknown,
}

/// Concern categories detected in chat messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Concern {
    /// Worry and nervousness
    Anxiety,
    /// Low mood
    Depression,
    /// Pressure and overwhelm
    Stress,
    /// Sleep problems and tiredness
    Sleep,
    /// Isolation
    Loneliness,
}

impl Concern {
    /// Categories in scan order
    pub const ALL: [Self; 5] = [
        Self::Anxiety,
        Self::Depression,
        Self::Stress,
        Self::Sleep,
        Self::Loneliness,
    ];

    /// Lower-case keywords matched as substrings
    #[must_use]
    pub const fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Anxiety => &["anxiety", "worry", "nervous"],
            Self::Depression => &["depression", "sad", "down"],
            Self::Stress => &["stress", "pressure", "overwhelmed"],
            Self::Sleep => &["sleep", "insomnia", "tired"],
            Self::Loneliness => &["lonely", "isolated", "alone"],
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords().iter().any(|keyword| lowered.contains(keyword))
    }
}

// ============================================================================
// Aggregator
// ============================================================================

/// Round to two decimal places
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Stateless label derivations over record history
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    /// Arithmetic mean rounded to two places; `None` for no samples
    #[must_use]
    pub fn average(samples: &[f64]) -> Option<f64> {
        mean(samples).map(round2)
    }

    /// Compare the mean of the second half against the first half
    #[must_use]
    pub fn trend(samples: &[f64]) -> Trend {
        if samples.len() < 2 {
            return Trend::InsufficientData;
        }

        let (first, second) = samples.split_at(samples.len() / 2);
        let (Some(first_mean), Some(second_mean)) = (mean(first), mean(second)) else {
            return Trend::InsufficientData;
        };

        let delta = second_mean - first_mean;
        if delta > thresholds::TREND_DELTA {
            Trend::Improving
        } else if delta < -thresholds::TREND_DELTA {
            Trend::Declining
        } else {
            Trend::Stable
        }
    }

    /// Bucket the population variance
    #[must_use]
    pub fn consistency(samples: &[f64]) -> Consistency {
        if samples.len() < 2 {
            return Consistency::InsufficientData;
        }
        let Some(center) = mean(samples) else {
            return Consistency::InsufficientData;
        };

        let variance = samples
            .iter()
            .map(|value| (value - center).powi(2))
            .sum::<f64>()
            / samples.len() as f64;

        if variance < thresholds::VARIANCE_VERY_CONSISTENT {
            Consistency::VeryConsistent
        } else if variance < thresholds::VARIANCE_CONSISTENT {
            Consistency::Consistent
        } else if variance < thresholds::VARIANCE_VARIABLE {
            Consistency::Variable
        } else {
            Consistency::HighlyVariable
        }
    }

    /// Engagement from a session count
    #[must_use]
    pub const fn engagement(sessions: usize) -> Engagement {
        if sessions == 0 {
            Engagement::InsufficientData
        } else if sessions >= thresholds::ENGAGEMENT_HIGH {
            Engagement::High
        } else if sessions >= thresholds::ENGAGEMENT_MEDIUM {
            Engagement::Medium
        } else {
            Engagement::Low
        }
    }

    /// Wellbeing label from the most recent assessment
    #[must_use]
    pub fn wellbeing(latest: Option<&AssessmentSummary>) -> Wellbeing {
        let Some(summary) = latest else {
            return Wellbeing::Unknown;
        };

        if summary.total <= assessment::MINIMAL_MAX {
            Wellbeing::Good
        } else if summary.total <= assessment::MILD_MAX {
            Wellbeing::Fair
        } else if summary.total <= assessment::MODERATE_MAX {
            Wellbeing::Concerning
        } else {
            Wellbeing::Critical
        }
    }

    /// Tally concern categories across messages
    ///
    /// A message may count toward several categories. Categories are
    /// ordered by descending count; ties keep first-seen order.
    #[must_use]
    pub fn top_concerns<'a, I>(messages: I) -> Vec<(Concern, usize)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tally: Vec<(Concern, usize)> = Vec::new();

        for message in messages {
            let lowered = message.to_lowercase();
            for concern in Concern::ALL {
                if !concern.matches(&lowered) {
                    continue;
                }
                match tally.iter_mut().find(|(seen, _)| *seen == concern) {
                    Some((_, count)) => *count += 1,
                    None => tally.push((concern, 1)),
                }
            }
        }

        tally.sort_by(|a, b| b.1.cmp(&a.1));
        tally.truncate(windows::TOP_CONCERNS);
        tally
    }

    /// Compare newest against oldest of up to three totals (newest first)
    #[must_use]
    pub fn assessment_improvement(totals_newest_first: &[i64]) -> AssessmentImprovement {
        let window = &totals_newest_first
            [..totals_newest_first.len().min(windows::ASSESSMENT_TREND_COUNT)];
        let &[newest, .., oldest] = window else {
            return AssessmentImprovement::InsufficientData;
        };

        if newest < oldest - thresholds::ASSESSMENT_DELTA {
            AssessmentImprovement::Improving
        } else if newest > oldest + thresholds::ASSESSMENT_DELTA {
            AssessmentImprovement::Declining
        } else {
            AssessmentImprovement::Stable
        }
    }

    /// Mean feeling change across exercises, two places
    #[must_use]
    pub fn cognitive_average_improvement(records: &[CognitiveRecord]) -> Option<f64> {
        let improvements: Vec<f64> = records
            .iter()
            .map(|record| record.improvement() as f64)
            .collect();
        Self::average(&improvements)
    }

    /// Most frequent situations, keyed by their first 50 lower-case characters
    #[must_use]
    pub fn common_situations(records: &[CognitiveRecord]) -> Vec<(String, usize)> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for record in records.iter().filter(|r| !r.situation.is_empty()) {
            let key: String = record
                .situation
                .to_lowercase()
                .chars()
                .take(windows::SITUATION_KEY_CHARS)
                .collect();
            let count = counts.entry(key.clone()).or_insert(0);
            if *count == 0 {
                order.push(key);
            }
            *count += 1;
        }

        let mut ranked: Vec<(String, usize)> = order
            .into_iter()
            .map(|key| {
                let count = counts.get(&key).copied().unwrap_or_default();
                (key, count)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(windows::COMMON_SITUATIONS);
        ranked
    }

    /// Date of the first highest-scored mood
    #[must_use]
    pub fn best_day(moods: &[MoodRecord]) -> Option<NaiveDate> {
        moods
            .iter()
            .fold(None::<&MoodRecord>, |best, mood| match best {
                Some(current) if current.score >= mood.score => Some(current),
                _ => Some(mood),
            })
            .map(|mood| mood.date)
    }

    /// Date of the first lowest-scored mood
    #[must_use]
    pub fn challenging_day(moods: &[MoodRecord]) -> Option<NaiveDate> {
        moods
            .iter()
            .fold(None::<&MoodRecord>, |worst, mood| match worst {
                Some(current) if current.score <= mood.score => Some(current),
                _ => Some(mood),
            })
            .map(|mood| mood.date)
    }
}
