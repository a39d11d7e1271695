// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Progress tracking: daily log entries and free-text progress reports.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A validated daily log entry, before it is attached to an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLogEntry {
    /// Calendar day (YYYY-MM-DD); one entry per user per day
    pub date: NaiveDate,
    /// Body weight in kilograms
    #[validate(range(exclusive_min = 0.0, message = "Weight must be positive."))]
    pub weight: Option<f64>,
    pub workout_completed: Option<bool>,
    #[validate(range(exclusive_min = 0.0, message = "Arm circumference must be positive."))]
    pub arm_circumference: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Chest circumference must be positive."))]
    pub chest_circumference: Option<f64>,
    #[validate(range(exclusive_min = 0.0, message = "Waist circumference must be positive."))]
    pub waist_circumference: Option<f64>,
    pub workout_summary: Option<String>,
    pub mood: Option<String>,
    pub notes: Option<String>,
}

impl ProgressLogEntry {
    /// Apply this edit on top of a stored entry. Fields left out of the edit
    /// keep their stored values.
    pub fn merged_over(&self, stored: &ProgressLogEntry) -> ProgressLogEntry {
        fn keep<T: Clone>(edit: &Option<T>, stored: &Option<T>) -> Option<T> {
            edit.clone().or_else(|| stored.clone())
        }

        ProgressLogEntry {
            date: self.date,
            weight: keep(&self.weight, &stored.weight),
            workout_completed: keep(&self.workout_completed, &stored.workout_completed),
            arm_circumference: keep(&self.arm_circumference, &stored.arm_circumference),
            chest_circumference: keep(&self.chest_circumference, &stored.chest_circumference),
            waist_circumference: keep(&self.waist_circumference, &stored.waist_circumference),
            workout_summary: keep(&self.workout_summary, &stored.workout_summary),
            mood: keep(&self.mood, &stored.mood),
            notes: keep(&self.notes, &stored.notes),
        }
    }
}

/// A stored log entry, unique on (user_id, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressLog {
    pub id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: ProgressLogEntry,
}

impl ProgressLog {
    pub fn new(user_id: &str, entry: ProgressLogEntry, created_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at,
            entry,
        }
    }
}

/// Free-text progress report submitted for summarization. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProgressReport {
    #[validate(length(
        min = 10,
        message = "Please provide a brief report of your progress (at least 10 characters)."
    ))]
    pub report: String,
}

/// Model output for a progress report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub summary: String,
    pub encouragement: String,
}
