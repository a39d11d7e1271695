// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Health profile model, the input of plan generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// Gender as accepted by the plan prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-reported activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightlyActive",
            ActivityLevel::ModeratelyActive => "moderatelyActive",
            ActivityLevel::VeryActive => "veryActive",
            ActivityLevel::ExtraActive => "extraActive",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated health profile.
///
/// Only [`crate::validation::validate_profile`] should build one from user
/// input; the range attributes below are checked there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    /// Age in years
    #[validate(range(min = 1, max = 120, message = "must be between 1 and 120"))]
    pub age: u32,
    /// Height in centimeters
    #[validate(range(min = 50.0, max = 300.0, message = "must be between 50 and 300 cm"))]
    pub height: f64,
    /// Weight in kilograms
    #[validate(range(min = 10.0, max = 500.0, message = "must be between 10 and 500 kg"))]
    pub weight: f64,
    pub gender: Gender,
    pub activity_level: ActivityLevel,
    #[validate(length(min = 1, message = "Preferred cuisine is required"))]
    pub preferred_cuisine: String,
    #[validate(length(
        min = 1,
        message = "Diet preferences are required (e.g., vegetarian, vegan, none)"
    ))]
    pub diet_preferences: String,
    #[validate(length(
        min = 1,
        message = "Health goals are required (e.g., weight loss, muscle gain)"
    ))]
    pub health_goals: String,
    /// Free-text health issues; absent when the user reported none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_issues: Option<String>,
}

/// Profile row stored per user (one document per user ID).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    /// Owner (also used as document ID)
    pub user_id: String,
    /// Last time the profile was saved
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub profile: ProfileInput,
}
