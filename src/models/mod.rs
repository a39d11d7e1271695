// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod plan;
pub mod profile;
pub mod progress;

pub use plan::{GeneratedPlan, PlanOutput};
pub use profile::{ActivityLevel, Gender, ProfileInput, StoredProfile};
pub use progress::{ProgressLog, ProgressLogEntry, ProgressReport, ProgressSummary};
