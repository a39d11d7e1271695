// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod llm;
pub mod pipeline;
pub mod planner;
pub mod prompt;

pub use llm::{GeminiClient, GenerationError, LanguageModel};
pub use pipeline::PlanPipeline;
pub use planner::{CallState, PlanGenerator};
