// ABOUTME: PHQ-9 assessment scorer mapping an answer vector to band, crisis flag, and guidance
// ABOUTME: Pure and deterministic; the crisis adjustment overrides band risk and leads the advice
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! PHQ-9 scoring.

use mindwell_core::constants::{assessment, messages};
use mindwell_core::errors::{AppError, AppResult};
use mindwell_core::models::{AssessmentOutcome, RiskLevel, SeverityLevel};
use tracing::debug;

/// Clause appended to the summary when the self-harm question is positive
const CRISIS_SUMMARY_CLAUSE: &str = " Importantly, your responses indicate thoughts related to self-harm or death, which requires immediate attention and professional support.";

/// Recommendation placed first when the self-harm question is positive
const CRISIS_RECOMMENDATION: &str = "If you are having thoughts of hurting yourself, please contact a crisis hotline, emergency services, or mental health professional immediately";

/// Static guidance attached to one severity band
struct BandGuidance {
    summary: &'static str,
    recommendations: &'static [&'static str],
    risk_level: RiskLevel,
}

const MINIMAL: BandGuidance = BandGuidance {
    summary: "Your assessment indicates minimal depressive symptoms. This suggests that you are experiencing few or no symptoms of depression at this time. Continue monitoring your mental health and maintaining healthy lifestyle habits.",
    recommendations: &[
        "Continue monitoring your mood and emotional well-being regularly",
        "Maintain a balanced routine with regular sleep, exercise, and social connections",
        "Practice stress management techniques such as mindfulness or deep breathing",
        "Consider keeping a mood journal to track patterns over time",
    ],
    risk_level: RiskLevel::Low,
};

const MILD: BandGuidance = BandGuidance {
    summary: "Your assessment shows mild depressive symptoms. While these symptoms are present, they may be manageable with self-care strategies and lifestyle adjustments. Consider regular monitoring and proactive self-care.",
    recommendations: &[
        "Establish and maintain a consistent daily routine with regular sleep and meal times",
        "Engage in regular physical activity, even light exercise like walking for 20-30 minutes daily",
        "Practice relaxation techniques such as meditation, deep breathing, or progressive muscle relaxation",
        "Stay connected with friends, family, or support groups",
        "Consider speaking with a healthcare provider or counselor for additional support",
    ],
    risk_level: RiskLevel::Low,
};

const MODERATE: BandGuidance = BandGuidance {
    summary: "Your assessment indicates moderate depressive symptoms. These symptoms may be impacting your daily functioning. Professional support and intervention may be beneficial to help you manage these symptoms effectively.",
    recommendations: &[
        "Consider consulting with a mental health professional or healthcare provider",
        "Maintain a structured daily schedule with activities that provide a sense of accomplishment",
        "Practice regular physical exercise, aiming for at least 30 minutes of moderate activity most days",
        "Engage in activities you previously enjoyed, even if motivation is low",
        "Limit alcohol and avoid recreational drugs, as they can worsen symptoms",
        "Consider cognitive-behavioral therapy (CBT) or other evidence-based treatments",
    ],
    risk_level: RiskLevel::Medium,
};

const MODERATELY_SEVERE: BandGuidance = BandGuidance {
    summary: "Your assessment shows moderately severe depressive symptoms. These symptoms are likely significantly affecting your daily life. Professional support is strongly recommended to help you develop coping strategies and treatment options.",
    recommendations: &[
        "Seek professional mental health support as soon as possible",
        "Consider speaking with a healthcare provider about treatment options, including therapy and/or medication",
        "Establish a support network of trusted friends, family members, or support groups",
        "Prioritize self-care activities, even small ones, to maintain basic functioning",
        "Avoid isolation and maintain regular contact with others",
        "If you have thoughts of self-harm, contact a crisis hotline or emergency services immediately",
    ],
    risk_level: RiskLevel::High,
};

const SEVERE: BandGuidance = BandGuidance {
    summary: "Your assessment indicates severe depressive symptoms. These symptoms are significantly impacting your well-being and daily functioning. Immediate professional support is strongly recommended to ensure your safety and begin appropriate treatment.",
    recommendations: &[
        "Contact a mental health professional or healthcare provider immediately",
        "If you have thoughts of self-harm or suicide, contact a crisis hotline or emergency services right away",
        "Consider speaking with a trusted friend or family member about your situation",
        "Avoid making major life decisions while experiencing severe symptoms",
        "Follow through with professional treatment recommendations",
        "Ensure you have a safety plan in place if you experience thoughts of self-harm",
    ],
    risk_level: RiskLevel::High,
};

const fn guidance_for(level: SeverityLevel) -> &'static BandGuidance {
    match level {
        SeverityLevel::Minimal => &MINIMAL,
        SeverityLevel::Mild => &MILD,
        SeverityLevel::Moderate => &MODERATE,
        SeverityLevel::ModeratelySevere => &MODERATELY_SEVERE,
        SeverityLevel::Severe => &SEVERE,
    }
}

/// Scores PHQ-9 questionnaires
#[derive(Debug, Clone, Copy, Default)]
pub struct AssessmentScorer;

impl AssessmentScorer {
    /// Create a scorer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Score a nine-answer questionnaire
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the vector does not hold exactly nine
    /// entries, and `ValueOutOfRange` naming the offending question when an
    /// answer lies outside 0..=3.
    pub fn score(&self, answers: &[i64]) -> AppResult<AssessmentOutcome> {
        if answers.len() != assessment::QUESTION_COUNT {
            return Err(AppError::invalid_input(messages::ANSWER_COUNT));
        }

        let mut validated = [0_u8; assessment::QUESTION_COUNT];
        for (index, (&answer, slot)) in answers.iter().zip(validated.iter_mut()).enumerate() {
            if !(0..=assessment::MAX_ANSWER).contains(&answer) {
                return Err(AppError::value_out_of_range(format!(
                    "Answer {} must be between 0 and {}",
                    index + 1,
                    assessment::MAX_ANSWER
                )));
            }
            *slot = answer as u8;
        }

        let total: i64 = answers.iter().sum();
        let level = SeverityLevel::from_total(total);
        let crisis = validated[assessment::SELF_HARM_QUESTION_INDEX] >= 1;

        let guidance = guidance_for(level);
        let mut summary = guidance.summary.to_owned();
        let mut recommendations: Vec<String> = guidance
            .recommendations
            .iter()
            .map(|&text| text.to_owned())
            .collect();
        let mut risk_level = guidance.risk_level;

        if crisis {
            summary.push_str(CRISIS_SUMMARY_CLAUSE);
            recommendations.insert(0, CRISIS_RECOMMENDATION.to_owned());
            risk_level = RiskLevel::High;
        }

        debug!(total, level = %level, crisis, "Scored assessment");

        Ok(AssessmentOutcome {
            answers: validated,
            total,
            level,
            crisis,
            summary,
            recommendations,
            risk_level,
        })
    }
}

/// Score a questionnaire with the default scorer
///
/// # Errors
///
/// See [`AssessmentScorer::score`].
pub fn score_assessment(answers: &[i64]) -> AppResult<AssessmentOutcome> {
    AssessmentScorer::new().score(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_band_has_four_to_six_recommendations() {
        for level in [
            SeverityLevel::Minimal,
            SeverityLevel::Mild,
            SeverityLevel::Moderate,
            SeverityLevel::ModeratelySevere,
            SeverityLevel::Severe,
        ] {
            let count = guidance_for(level).recommendations.len();
            assert!((4..=6).contains(&count), "{level} has {count}");
        }
    }

    #[test]
    fn test_out_of_range_answer_names_question() {
        let error = score_assessment(&[0, 0, 4, 0, 0, 0, 0, 0, 0]).unwrap_err();
        assert_eq!(error.message, "Answer 3 must be between 0 and 3");
    }
}
