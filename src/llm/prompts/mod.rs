// ABOUTME: Prompts for companion replies and report narratives
// ABOUTME: The system prompt is loaded at compile time; the insights prompt is built from report counts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Mindwell Contributors

//! # Prompts
//!
//! The companion system prompt lives in a markdown file next to this module
//! so it can be edited without touching code.

use std::fmt::Write as _;

/// Companion system prompt
///
/// Constrains replies to one or two warm sentences with a single practical
/// suggestion, reserves professional-help advice for crisis content, and
/// forbids medical claims.
pub const COMPANION_SYSTEM_PROMPT: &str = include_str!("companion_system.md");

/// Get the companion system prompt without its trailing newline
#[must_use]
pub fn get_companion_system_prompt() -> &'static str {
    COMPANION_SYSTEM_PROMPT.trim_end()
}

/// Record counts summarized for the report narrative
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightCounts {
    /// Mood entries on record
    pub mood_entries: usize,
    /// Assessments completed
    pub assessments: usize,
    /// Chat sessions held
    pub chat_sessions: usize,
    /// Cognitive exercises completed
    pub cognitive_records: usize,
    /// Mean feeling change across those exercises
    pub cognitive_improvement: Option<f64>,
}

/// Build the prompt asking for a short narrative over the user's history
#[must_use]
pub fn build_insights_prompt(counts: &InsightCounts) -> String {
    let mut prompt = String::from("Based on this mental health data, provide a brief analysis:\n");
    let _ = writeln!(prompt, "- Mood entries: {} records", counts.mood_entries);
    let _ = writeln!(prompt, "- Assessments: {} completed", counts.assessments);
    let _ = writeln!(
        prompt,
        "- Chat sessions: {} conversations",
        counts.chat_sessions
    );
    if counts.cognitive_records > 0 {
        let _ = writeln!(
            prompt,
            "- Cognitive restructuring exercises: {} completed (average improvement: {:.1} points)",
            counts.cognitive_records,
            counts.cognitive_improvement.unwrap_or_default()
        );
    }
    prompt.push_str(
        "\nProvide insights on:\n\
         1. Overall mental health trends\n\
         2. Key patterns or concerns\n\
         3. Positive developments\n\
         4. Areas for improvement",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_constraints() {
        let prompt = get_companion_system_prompt();
        assert!(prompt.contains("1-2 sentences"));
        assert!(prompt.contains("self-harm"));
        assert!(!prompt.ends_with('\n'));
    }

    #[test]
    fn test_insights_prompt_mentions_cognitive_only_when_present() {
        let mut counts = InsightCounts {
            mood_entries: 4,
            assessments: 1,
            chat_sessions: 2,
            cognitive_records: 0,
            cognitive_improvement: None,
        };
        let prompt = build_insights_prompt(&counts);
        assert!(prompt.contains("Mood entries: 4 records"));
        assert!(!prompt.contains("Cognitive"));

        counts.cognitive_records = 3;
        counts.cognitive_improvement = Some(12.345);
        let prompt = build_insights_prompt(&counts);
        assert!(prompt.contains("3 completed (average improvement: 12.3 points)"));
    }
}
