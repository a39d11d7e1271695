// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Plan routes: generate, list, fetch and delete.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::GeneratedPlan;
use crate::routes::ActionResponse;
use crate::validation::ProfileForm;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/plans", get(list_plans).post(generate_plan))
        .route("/api/plans/{id}", get(get_plan).delete(delete_plan))
}

/// Save the profile, then generate and store a plan for it.
async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<ProfileForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse>)> {
    let Json(form) = body?;
    let plan = state
        .pipeline
        .save_profile_and_generate_plan(&user.user_id, &form)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse {
            success: true,
            message: "Profile saved and plan generated successfully!".to_string(),
            plan_id: Some(plan.id),
        }),
    ))
}

/// All of the caller's plans, newest first.
async fn list_plans(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<GeneratedPlan>>> {
    let plans = state.store.list_plans(&user.user_id).await?;
    tracing::debug!(count = plans.len(), "Listed plans");
    Ok(Json(plans))
}

async fn get_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<GeneratedPlan>> {
    Ok(Json(state.store.get_plan(&user.user_id, &id).await?))
}

async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>> {
    state.store.delete_plan(&user.user_id, &id).await?;
    Ok(Json(ActionResponse::ok("Plan deleted successfully!")))
}
