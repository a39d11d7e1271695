// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Prompt templates for plan generation and progress summaries.
//!
//! Rendering is pure: the same input always yields byte-identical text.

use std::fmt::Write as _;

use crate::models::{ProfileInput, ProgressReport};

/// Rendered in place of an absent optional field.
pub const ABSENT_MARKER: &str = "None reported";

const PLAN_INSTRUCTIONS: &str = "You are a personal trainer and nutritionist. Based on the \
following information, create a personalized diet and workout plan for the user.";

const SUMMARY_INSTRUCTIONS: &str = "You are an AI fitness coach. You will analyze the progress \
report of the user and provide a summary of the progress made and some words of encouragement \
to keep motivated.";

/// Render the plan prompt. Fields appear one per line, always in this order:
/// age, height, weight, gender, activity level, cuisine, diet preferences,
/// health goals, health issues.
pub fn render_plan_prompt(profile: &ProfileInput) -> String {
    let health_issues = profile.health_issues.as_deref().unwrap_or(ABSENT_MARKER);

    let mut prompt = String::with_capacity(512);
    prompt.push_str(PLAN_INSTRUCTIONS);
    prompt.push_str("\n\n");

    // Writing to a String cannot fail.
    let _ = writeln!(prompt, "Age: {}", profile.age);
    let _ = writeln!(prompt, "Height: {} cm", profile.height);
    let _ = writeln!(prompt, "Weight: {} kg", profile.weight);
    let _ = writeln!(prompt, "Gender: {}", profile.gender);
    let _ = writeln!(prompt, "Activity Level: {}", profile.activity_level);
    let _ = writeln!(
        prompt,
        "Preferred Cuisine: {}",
        single_line(&profile.preferred_cuisine)
    );
    let _ = writeln!(
        prompt,
        "Diet Preferences: {}",
        single_line(&profile.diet_preferences)
    );
    let _ = writeln!(prompt, "Health Goals: {}", single_line(&profile.health_goals));
    let _ = writeln!(prompt, "Health Issues: {}", single_line(health_issues));

    prompt.push_str("\nDiet Plan:\nWorkout Plan:");
    prompt
}

/// Free text must stay on its own line, so line breaks become spaces.
fn single_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the progress summary prompt. The report text is passed through as-is.
pub fn render_summary_prompt(report: &ProgressReport) -> String {
    format!(
        "{}\n\nProgress Report: {}",
        SUMMARY_INSTRUCTIONS, report.report
    )
}
