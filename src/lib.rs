// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! FitPlan: personalized diet and workout plans from a health profile
//!
//! This crate provides the backend API that validates a user's profile,
//! asks a language model for a structured plan, and stores plans and daily
//! progress logs per user.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod validation;

use config::Config;
use db::PlanStore;
use services::PlanPipeline;
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn PlanStore>,
    pub pipeline: PlanPipeline,
}
