// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Generated diet and workout plans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ProfileInput;

/// Structured model output for a plan request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOutput {
    pub diet_plan: String,
    pub workout_plan: String,
}

/// A persisted plan. Created once, never updated; only the owner may read or
/// delete it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    /// Opaque identifier assigned by the store (also used as document ID)
    pub id: String,
    /// Owner
    pub user_id: String,
    /// Set by the store when the plan is written
    pub created_at: DateTime<Utc>,
    /// Profile snapshot the plan was generated from
    pub inputs: ProfileInput,
    pub diet_plan: String,
    pub workout_plan: String,
}

impl GeneratedPlan {
    /// Assemble a new plan record with a fresh identifier.
    pub fn new(
        user_id: &str,
        inputs: &ProfileInput,
        output: &PlanOutput,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            created_at,
            inputs: inputs.clone(),
            diet_plan: output.diet_plan.clone(),
            workout_plan: output.workout_plan.clone(),
        }
    }

    /// The model output half of the record.
    pub fn output(&self) -> PlanOutput {
        PlanOutput {
            diet_plan: self.diet_plan.clone(),
            workout_plan: self.workout_plan.clone(),
        }
    }
}
