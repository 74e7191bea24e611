// ABOUTME: Rule-priority chain producing ranked recommendations and next steps for a report
// ABOUTME: Crisis state claims the top slot; truncation keeps the earliest, highest-priority entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Recommendation Engine
//!
//! Rules run in a fixed order and each may contribute one entry. The first
//! rule covers severity: a crisis flag takes that slot and suppresses the
//! ordinary severity advice, but later rules (mood tracking, engagement,
//! cognitive practice, self-care) still run. Output is truncated to the
//! configured limits after the chain completes.

use mindwell_core::constants::thresholds;
use mindwell_core::models::{AssessmentSummary, Priority};
use serde::{Deserialize, Serialize};

/// Facts the rule chain inspects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationContext {
    /// Most recent assessment, if any
    pub latest_assessment: Option<AssessmentSummary>,
    /// Mean mood score over the recent window; `None` when no moods were logged
    pub mood_average: Option<f64>,
    /// Chat sessions in the recent window
    pub recent_chats: usize,
    /// Cognitive exercises completed in the recent window
    pub recent_cognitive: usize,
    /// Mean feeling change of those exercises
    pub recent_cognitive_improvement: Option<f64>,
}

impl RecommendationContext {
    fn crisis(&self) -> bool {
        self.latest_assessment.is_some_and(|a| a.crisis)
    }

    fn total(&self) -> Option<i64> {
        self.latest_assessment.map(|a| a.total)
    }

    fn low_mood(&self) -> bool {
        self.mood_average
            .is_some_and(|average| average < thresholds::LOW_MOOD)
    }
}

/// One recommendation in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Short headline
    pub title: String,
    /// What to do
    pub description: String,
    /// Relative importance
    pub priority: Priority,
}

impl Recommendation {
    fn new(title: &str, description: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.to_owned(),
            description: description.into(),
            priority,
        }
    }
}

/// One next step in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextStep {
    /// Short headline
    pub title: String,
    /// What to do
    pub description: String,
    /// How soon
    pub urgency: Priority,
}

impl NextStep {
    fn new(title: &str, description: &str, urgency: Priority) -> Self {
        Self {
            title: title.to_owned(),
            description: description.to_owned(),
            urgency,
        }
    }
}

/// Output limits for the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationEngineConfig {
    /// Maximum recommendations returned
    pub max_recommendations: usize,
    /// Maximum next steps returned
    pub max_next_steps: usize,
}

impl Default for RecommendationEngineConfig {
    fn default() -> Self {
        Self {
            max_recommendations: thresholds::MAX_RECOMMENDATIONS,
            max_next_steps: thresholds::MAX_NEXT_STEPS,
        }
    }
}

// ============================================================================
// Recommendation Rules
// ============================================================================

type RecommendationRule = fn(&RecommendationContext) -> Option<Recommendation>;

const RECOMMENDATION_RULES: [RecommendationRule; 6] = [
    severity_rule,
    mood_tracking_rule,
    support_engagement_rule,
    cognitive_rule,
    self_care_rule,
    mindfulness_rule,
];

fn severity_rule(ctx: &RecommendationContext) -> Option<Recommendation> {
    let total = ctx.total().unwrap_or_default();

    if ctx.crisis() {
        Some(Recommendation::new(
            "Seek Immediate Professional Help",
            "Your assessment indicates crisis indicators. Please contact a mental health professional or crisis support service immediately.",
            Priority::High,
        ))
    } else if ctx.low_mood() || total > thresholds::CONSULT_TOTAL {
        Some(Recommendation::new(
            "Consult with a Mental Health Professional",
            "Consider speaking with a mental health professional to discuss your symptoms and develop a treatment plan.",
            Priority::High,
        ))
    } else if total > thresholds::SUPPORT_TOTAL {
        Some(Recommendation::new(
            "Consider Professional Support",
            "Professional support may help you manage your symptoms more effectively.",
            Priority::Medium,
        ))
    } else {
        None
    }
}

fn mood_tracking_rule(ctx: &RecommendationContext) -> Option<Recommendation> {
    ctx.low_mood().then(|| {
        Recommendation::new(
            "Practice Mood Tracking",
            "Continue tracking your mood daily to identify patterns and triggers.",
            Priority::Medium,
        )
    })
}

fn support_engagement_rule(ctx: &RecommendationContext) -> Option<Recommendation> {
    (ctx.recent_chats < thresholds::SUPPORT_CHATS).then(|| {
        Recommendation::new(
            "Engage with Support Resources",
            "Use the AI assistant and other support tools regularly for emotional support and guidance.",
            Priority::Low,
        )
    })
}

fn cognitive_rule(ctx: &RecommendationContext) -> Option<Recommendation> {
    if ctx.recent_cognitive == 0 {
        return Some(Recommendation::new(
            "Try Cognitive Restructuring Tools",
            "Use the cognitive restructuring tool in Self-help Tools to challenge negative thoughts and improve emotional regulation.",
            Priority::Low,
        ));
    }

    match ctx.recent_cognitive_improvement {
        Some(improvement) if improvement > thresholds::COGNITIVE_PROGRESS => {
            Some(Recommendation::new(
                "Continue Cognitive Restructuring Practice",
                format!(
                    "Your cognitive restructuring exercises are showing positive results (average improvement: {improvement:.0} points). Keep practicing to maintain this progress."
                ),
                Priority::Medium,
            ))
        }
        _ if ctx.recent_cognitive >= thresholds::COGNITIVE_REVIEW_COUNT => Some(Recommendation::new(
            "Review Cognitive Restructuring Patterns",
            "You've completed several cognitive restructuring exercises. Review your patterns to identify which situations trigger negative thoughts most often.",
            Priority::Low,
        )),
        _ => None,
    }
}

fn self_care_rule(_: &RecommendationContext) -> Option<Recommendation> {
    Some(Recommendation::new(
        "Maintain Self-Care Routine",
        "Practice regular self-care activities including exercise, healthy eating, and adequate sleep.",
        Priority::Medium,
    ))
}

fn mindfulness_rule(_: &RecommendationContext) -> Option<Recommendation> {
    Some(Recommendation::new(
        "Practice Mindfulness",
        "Consider mindfulness or meditation practices to help manage stress and improve emotional regulation.",
        Priority::Low,
    ))
}

// ============================================================================
// Engine
// ============================================================================

/// Rule-based recommendation engine
#[derive(Debug, Clone, Copy, Default)]
pub struct RecommendationEngine {
    config: RecommendationEngineConfig,
}

impl RecommendationEngine {
    /// Create an engine with default limits
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with custom limits
    #[must_use]
    pub const fn with_config(config: RecommendationEngineConfig) -> Self {
        Self { config }
    }

    /// Run the recommendation chain
    #[must_use]
    pub fn generate_recommendations(&self, ctx: &RecommendationContext) -> Vec<Recommendation> {
        let mut recommendations: Vec<Recommendation> = RECOMMENDATION_RULES
            .iter()
            .filter_map(|rule| rule(ctx))
            .collect();
        recommendations.truncate(self.config.max_recommendations);
        recommendations
    }

    /// Run the next-step chain
    #[must_use]
    pub fn generate_next_steps(&self, ctx: &RecommendationContext) -> Vec<NextStep> {
        let mut steps = Vec::with_capacity(5);

        if ctx.crisis() {
            steps.push(NextStep::new(
                "Contact Mental Health Professional",
                "Contact a mental health professional immediately for urgent support and assessment.",
                Priority::High,
            ));
            steps.push(NextStep::new(
                "Access Crisis Support Resources",
                "Reach out to crisis support services or hotlines for immediate assistance.",
                Priority::High,
            ));
        } else if ctx.total().unwrap_or_default() > thresholds::APPOINTMENT_TOTAL {
            steps.push(NextStep::new(
                "Schedule Professional Appointment",
                "Schedule an appointment with a mental health professional to discuss your assessment results.",
                Priority::High,
            ));
            steps.push(NextStep::new(
                "Continue Monitoring Symptoms",
                "Keep tracking your mood and symptoms regularly to monitor changes.",
                Priority::Medium,
            ));
        } else {
            steps.push(NextStep::new(
                "Maintain Self-Care Practices",
                "Continue your current self-care practices and healthy routines.",
                Priority::Low,
            ));
            steps.push(NextStep::new(
                "Regular Mood Tracking",
                "Continue tracking your mood daily to identify patterns and trends.",
                Priority::Low,
            ));
        }

        if ctx.recent_chats < thresholds::ENGAGEMENT_CHATS {
            steps.push(NextStep::new(
                "Increase Engagement with Support Tools",
                "Engage more frequently with the AI assistant and other support resources.",
                Priority::Medium,
            ));
        }

        steps.push(NextStep::new(
            "Review and Set Personal Goals",
            "Take time to review your progress and set achievable mental health goals.",
            Priority::Low,
        ));

        steps.truncate(self.config.max_next_steps);
        steps
    }
}
