// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.
//!
//! [`PlanStore`] is the gateway the rest of the service talks to. Every
//! operation takes the owner explicitly and filters on it; a row owned by
//! someone else looks exactly like a missing row.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryStore;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppError;
use crate::models::{
    GeneratedPlan, PlanOutput, ProfileInput, ProgressLog, ProgressLogEntry, StoredProfile,
};
use crate::validation::format_log_date;

/// Collection names as constants.
pub mod collections {
    /// Latest profile per user (keyed by user ID)
    pub const PROFILES: &str = "profiles";
    /// Generated plans (keyed by plan ID)
    pub const GENERATED_PLANS: &str = "generated_plans";
    /// Daily progress logs (keyed by user ID + date)
    pub const PROGRESS_LOGS: &str = "progress_logs";
}

/// Storage gateway for profiles, plans and progress logs.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Create or replace the owner's profile.
    async fn upsert_profile(
        &self,
        owner: &str,
        profile: &ProfileInput,
    ) -> Result<StoredProfile, AppError>;

    /// The owner's current profile, if one was ever saved.
    async fn get_profile(&self, owner: &str) -> Result<Option<StoredProfile>, AppError>;

    /// Persist a new plan. The returned record carries the assigned ID.
    async fn insert_plan(
        &self,
        owner: &str,
        inputs: &ProfileInput,
        output: &PlanOutput,
    ) -> Result<GeneratedPlan, AppError>;

    /// All of the owner's plans, newest first.
    async fn list_plans(&self, owner: &str) -> Result<Vec<GeneratedPlan>, AppError>;

    /// One plan, or `NotFound` if missing or owned by someone else.
    async fn get_plan(&self, owner: &str, plan_id: &str) -> Result<GeneratedPlan, AppError>;

    /// Delete a plan, or `NotFound` if missing or owned by someone else.
    async fn delete_plan(&self, owner: &str, plan_id: &str) -> Result<(), AppError>;

    /// Create the log for `entry.date`; `Conflict` if one already exists.
    async fn insert_progress_log(
        &self,
        owner: &str,
        entry: &ProgressLogEntry,
    ) -> Result<ProgressLog, AppError>;

    /// Create or update in place the log for `entry.date`.
    async fn upsert_progress_log(
        &self,
        owner: &str,
        entry: &ProgressLogEntry,
    ) -> Result<ProgressLog, AppError>;

    /// All of the owner's logs, oldest date first.
    async fn list_progress_logs(&self, owner: &str) -> Result<Vec<ProgressLog>, AppError>;

    async fn get_progress_log(
        &self,
        owner: &str,
        date: NaiveDate,
    ) -> Result<Option<ProgressLog>, AppError>;

    /// Delete the log for `date`, or `NotFound` if there is none.
    async fn delete_progress_log(&self, owner: &str, date: NaiveDate) -> Result<(), AppError>;
}

/// Reject an empty owner before touching storage.
pub(crate) fn require_owner(owner: &str) -> Result<&str, AppError> {
    let owner = owner.trim();
    if owner.is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(owner)
}

/// Document ID for a progress log: one per (owner, day).
pub(crate) fn progress_log_id(owner: &str, date: NaiveDate) -> String {
    format!("{}_{}", urlencoding::encode(owner), format_log_date(date))
}

/// Not-found error for a plan that is missing or belongs to someone else.
pub(crate) fn plan_not_found(plan_id: &str) -> AppError {
    AppError::NotFound(format!("Plan {} not found", plan_id))
}

/// Not-found error for a missing progress log.
pub(crate) fn progress_log_not_found(date: NaiveDate) -> AppError {
    AppError::NotFound(format!("No progress log for {}", format_log_date(date)))
}
