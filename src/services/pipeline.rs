// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile-to-plan pipeline.
//!
//! validate -> save profile -> generate -> save plan. Validation failures
//! return before any storage or model call. Saving the profile and saving the
//! plan are separate steps: if generation fails after the profile was saved,
//! the profile stays.

use std::sync::Arc;

use crate::db::PlanStore;
use crate::error::AppError;
use crate::models::{GeneratedPlan, ProgressSummary, StoredProfile};
use crate::services::planner::PlanGenerator;
use crate::validation::{validate_profile, validate_report, ProfileForm, ReportForm};

/// Orchestrates validation, generation and persistence.
#[derive(Clone)]
pub struct PlanPipeline {
    store: Arc<dyn PlanStore>,
    generator: PlanGenerator,
}

impl PlanPipeline {
    pub fn new(store: Arc<dyn PlanStore>, generator: PlanGenerator) -> Self {
        Self { store, generator }
    }

    /// Validate and store the owner's profile without generating a plan.
    pub async fn save_profile(
        &self,
        owner: &str,
        form: &ProfileForm,
    ) -> Result<StoredProfile, AppError> {
        let profile = validate_profile(form)?;
        self.store.upsert_profile(owner, &profile).await
    }

    /// Validate the profile, save it, generate a plan from it and store the plan.
    pub async fn save_profile_and_generate_plan(
        &self,
        owner: &str,
        form: &ProfileForm,
    ) -> Result<GeneratedPlan, AppError> {
        let profile = validate_profile(form)?;

        self.store.upsert_profile(owner, &profile).await?;

        let output = self.generator.generate(&profile).await.map_err(|e| {
            tracing::warn!(error = %e, "Plan generation failed; profile kept");
            AppError::from(e)
        })?;

        let plan = self.store.insert_plan(owner, &profile, &output).await?;
        tracing::info!(plan_id = %plan.id, "Plan generated");
        Ok(plan)
    }

    /// Validate a free-text progress report and summarize it. Nothing is stored.
    pub async fn summarize_progress(&self, form: &ReportForm) -> Result<ProgressSummary, AppError> {
        let report = validate_report(form)?;
        Ok(self.generator.summarize(&report).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::services::llm::{GenerationError, LanguageModel};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingModel {
        answer: Result<String, GenerationError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LanguageModel for CountingModel {
        async fn generate_json(
            &self,
            _prompt: &str,
            _schema: &Value,
        ) -> Result<String, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    fn pipeline(
        answer: Result<&str, GenerationError>,
    ) -> (PlanPipeline, Arc<MemoryStore>, Arc<CountingModel>) {
        let store = Arc::new(MemoryStore::new());
        let model = Arc::new(CountingModel {
            answer: answer.map(str::to_string),
            calls: AtomicUsize::new(0),
        });
        let pipeline = PlanPipeline::new(store.clone(), PlanGenerator::new(model.clone()));
        (pipeline, store, model)
    }

    fn form(value: Value) -> ProfileForm {
        serde_json::from_value(value).unwrap()
    }

    fn valid_form() -> ProfileForm {
        form(json!({
            "age": 30,
            "height": 175,
            "weight": 70,
            "gender": "male",
            "activityLevel": "moderatelyActive",
            "preferredCuisine": "Italian",
            "dietPreferences": "none",
            "healthGoals": "lose 5kg"
        }))
    }

    #[tokio::test]
    async fn test_generate_stores_profile_and_plan() {
        let (pipeline, store, model) =
            pipeline(Ok(r#"{"dietPlan": "Pasta", "workoutPlan": "Run"}"#));

        let plan = pipeline
            .save_profile_and_generate_plan("alice", &valid_form())
            .await
            .unwrap();

        assert_eq!(plan.diet_plan, "Pasta");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
        assert_eq!(store.get_plan("alice", &plan.id).await.unwrap(), plan);
        assert!(store.get_profile("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_invalid_profile_makes_no_calls() {
        let (pipeline, store, model) = pipeline(Ok("{}"));

        let mut bad = valid_form();
        bad.age = Some(json!(0));
        let err = pipeline
            .save_profile_and_generate_plan("alice", &bad)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref v) if v.has_field("age")));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert!(store.get_profile("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_profile() {
        let (pipeline, store, _model) = pipeline(Err(GenerationError::Rejected {
            status: 500,
            message: "boom".to_string(),
        }));

        let err = pipeline
            .save_profile_and_generate_plan("alice", &valid_form())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Generation(_)));
        assert!(store.get_profile("alice").await.unwrap().is_some());
        assert!(store.list_plans("alice").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_short_report_makes_no_call() {
        let (pipeline, _store, model) = pipeline(Ok("{}"));

        let report: ReportForm = serde_json::from_value(json!({"report": "ok"})).unwrap();
        let err = pipeline.summarize_progress(&report).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(ref v) if v.has_field("report")));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }
}
