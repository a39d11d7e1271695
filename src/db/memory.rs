// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for local development and tests.
//!
//! Same contract as the Firestore store. Data lives only as long as the
//! process does.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::db::{
    plan_not_found, progress_log_id, progress_log_not_found, require_owner, PlanStore,
};
use crate::error::AppError;
use crate::models::{
    GeneratedPlan, PlanOutput, ProfileInput, ProgressLog, ProgressLogEntry, StoredProfile,
};

/// Concurrent map store. Cloning shares the underlying maps.
#[derive(Clone, Default)]
pub struct MemoryStore {
    /// Keyed by owner
    profiles: Arc<DashMap<String, StoredProfile>>,
    /// Keyed by plan ID
    plans: Arc<DashMap<String, GeneratedPlan>>,
    /// Keyed by [`progress_log_id`]
    progress_logs: Arc<DashMap<String, ProgressLog>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn upsert_profile(
        &self,
        owner: &str,
        profile: &ProfileInput,
    ) -> Result<StoredProfile, AppError> {
        let owner = require_owner(owner)?;
        let stored = StoredProfile {
            user_id: owner.to_string(),
            updated_at: Utc::now(),
            profile: profile.clone(),
        };
        self.profiles.insert(owner.to_string(), stored.clone());
        Ok(stored)
    }

    async fn get_profile(&self, owner: &str) -> Result<Option<StoredProfile>, AppError> {
        let owner = require_owner(owner)?;
        Ok(self.profiles.get(owner).map(|p| p.value().clone()))
    }

    async fn insert_plan(
        &self,
        owner: &str,
        inputs: &ProfileInput,
        output: &PlanOutput,
    ) -> Result<GeneratedPlan, AppError> {
        let owner = require_owner(owner)?;
        let plan = GeneratedPlan::new(owner, inputs, output, Utc::now());
        self.plans.insert(plan.id.clone(), plan.clone());
        Ok(plan)
    }

    async fn list_plans(&self, owner: &str) -> Result<Vec<GeneratedPlan>, AppError> {
        let owner = require_owner(owner)?;
        let mut plans: Vec<GeneratedPlan> = self
            .plans
            .iter()
            .filter(|p| p.user_id == owner)
            .map(|p| p.value().clone())
            .collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }

    async fn get_plan(&self, owner: &str, plan_id: &str) -> Result<GeneratedPlan, AppError> {
        let owner = require_owner(owner)?;
        self.plans
            .get(plan_id)
            .filter(|p| p.user_id == owner)
            .map(|p| p.value().clone())
            .ok_or_else(|| plan_not_found(plan_id))
    }

    async fn delete_plan(&self, owner: &str, plan_id: &str) -> Result<(), AppError> {
        let owner = require_owner(owner)?;
        self.plans
            .remove_if(plan_id, |_, p| p.user_id == owner)
            .map(|_| ())
            .ok_or_else(|| plan_not_found(plan_id))
    }

    async fn insert_progress_log(
        &self,
        owner: &str,
        entry: &ProgressLogEntry,
    ) -> Result<ProgressLog, AppError> {
        let owner = require_owner(owner)?;
        match self.progress_logs.entry(progress_log_id(owner, entry.date)) {
            Entry::Occupied(_) => Err(AppError::Conflict(
                AppError::PROGRESS_LOG_EXISTS.to_string(),
            )),
            Entry::Vacant(slot) => {
                let log = ProgressLog::new(owner, entry.clone(), Utc::now());
                slot.insert(log.clone());
                Ok(log)
            }
        }
    }

    async fn upsert_progress_log(
        &self,
        owner: &str,
        entry: &ProgressLogEntry,
    ) -> Result<ProgressLog, AppError> {
        let owner = require_owner(owner)?;
        let log = match self.progress_logs.entry(progress_log_id(owner, entry.date)) {
            Entry::Occupied(mut slot) => {
                let merged = entry.merged_over(&slot.get().entry);
                slot.get_mut().entry = merged;
                slot.get().clone()
            }
            Entry::Vacant(slot) => {
                let log = ProgressLog::new(owner, entry.clone(), Utc::now());
                slot.insert(log.clone());
                log
            }
        };
        Ok(log)
    }

    async fn list_progress_logs(&self, owner: &str) -> Result<Vec<ProgressLog>, AppError> {
        let owner = require_owner(owner)?;
        let mut logs: Vec<ProgressLog> = self
            .progress_logs
            .iter()
            .filter(|l| l.user_id == owner)
            .map(|l| l.value().clone())
            .collect();
        logs.sort_by_key(|l| l.entry.date);
        Ok(logs)
    }

    async fn get_progress_log(
        &self,
        owner: &str,
        date: NaiveDate,
    ) -> Result<Option<ProgressLog>, AppError> {
        let owner = require_owner(owner)?;
        Ok(self
            .progress_logs
            .get(&progress_log_id(owner, date))
            .filter(|l| l.user_id == owner)
            .map(|l| l.value().clone()))
    }

    async fn delete_progress_log(&self, owner: &str, date: NaiveDate) -> Result<(), AppError> {
        let owner = require_owner(owner)?;
        self.progress_logs
            .remove_if(&progress_log_id(owner, date), |_, l| l.user_id == owner)
            .map(|_| ())
            .ok_or_else(|| progress_log_not_found(date))
    }
}
