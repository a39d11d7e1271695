// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan generation and progress summarization on top of a [`LanguageModel`].
//!
//! Each call renders a prompt, asks the model for JSON constrained by a
//! response schema, and parses it into a typed output. A call either yields
//! the complete output or a [`GenerationError`]; there is no partial result.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;

use crate::models::{PlanOutput, ProfileInput, ProgressReport, ProgressSummary};
use crate::services::llm::{GenerationError, LanguageModel};
use crate::services::prompt::{render_plan_prompt, render_summary_prompt};

/// Lifecycle of a single model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

impl CallState {
    pub fn is_terminal(self) -> bool {
        matches!(self, CallState::Succeeded | CallState::Failed)
    }
}

/// Tracks one model call. Transitions only move forward:
/// `Idle -> Requesting -> Succeeded | Failed`.
#[derive(Debug)]
pub(crate) struct ModelCall {
    kind: &'static str,
    state: CallState,
    started: Option<Instant>,
}

impl ModelCall {
    pub(crate) fn new(kind: &'static str) -> Self {
        Self {
            kind,
            state: CallState::Idle,
            started: None,
        }
    }

    pub(crate) fn state(&self) -> CallState {
        self.state
    }

    pub(crate) fn begin(&mut self) {
        if self.state != CallState::Idle {
            return;
        }
        self.state = CallState::Requesting;
        self.started = Some(Instant::now());
        tracing::debug!(kind = self.kind, "Model call requesting");
    }

    pub(crate) fn finish<T>(&mut self, result: &Result<T, GenerationError>) {
        if self.state != CallState::Requesting {
            return;
        }

        let elapsed_ms = self
            .started
            .map(|s| s.elapsed().as_millis() as u64)
            .unwrap_or_default();

        match result {
            Ok(_) => {
                self.state = CallState::Succeeded;
                tracing::info!(kind = self.kind, elapsed_ms, "Model call succeeded");
            }
            Err(e) => {
                self.state = CallState::Failed;
                tracing::warn!(kind = self.kind, elapsed_ms, error = %e, "Model call failed");
            }
        }
    }
}

/// JSON schema for [`PlanOutput`].
pub fn plan_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "dietPlan": {
                "type": "STRING",
                "description": "The personalized diet plan for the user."
            },
            "workoutPlan": {
                "type": "STRING",
                "description": "The personalized workout plan for the user."
            }
        },
        "required": ["dietPlan", "workoutPlan"],
        "propertyOrdering": ["dietPlan", "workoutPlan"]
    })
}

/// JSON schema for [`ProgressSummary`].
pub fn summary_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "summary": {
                "type": "STRING",
                "description": "A summary of the progress made."
            },
            "encouragement": {
                "type": "STRING",
                "description": "Words of encouragement to keep motivated."
            }
        },
        "required": ["summary", "encouragement"],
        "propertyOrdering": ["summary", "encouragement"]
    })
}

/// Generates plans and summaries. Holds no per-call state.
#[derive(Clone)]
pub struct PlanGenerator {
    model: Arc<dyn LanguageModel>,
}

impl PlanGenerator {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }

    /// Generate a diet and workout plan for a validated profile.
    pub async fn generate(&self, profile: &ProfileInput) -> Result<PlanOutput, GenerationError> {
        let prompt = render_plan_prompt(profile);
        self.request("plan", &prompt, &plan_schema()).await
    }

    /// Summarize a validated progress report.
    pub async fn summarize(
        &self,
        report: &ProgressReport,
    ) -> Result<ProgressSummary, GenerationError> {
        let prompt = render_summary_prompt(report);
        self.request("summary", &prompt, &summary_schema()).await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        kind: &'static str,
        prompt: &str,
        schema: &Value,
    ) -> Result<T, GenerationError> {
        let mut call = ModelCall::new(kind);
        call.begin();

        let result = match self.model.generate_json(prompt, schema).await {
            Ok(text) => parse_structured(&text),
            Err(e) => Err(e),
        };

        call.finish(&result);
        debug_assert!(call.state().is_terminal());
        result
    }
}

/// Parse model JSON into `T`. Tolerates a surrounding markdown code fence.
fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, GenerationError> {
    let trimmed = text.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(unfenced.trim()).map_err(|e| GenerationError::Malformed(e.to_string()))
}
