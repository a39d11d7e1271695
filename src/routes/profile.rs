// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile routes: fetch the latest profile and save a new one.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::StoredProfile;
use crate::routes::ActionResponse;
use crate::validation::ProfileForm;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/profile", get(get_profile).put(save_profile))
}

/// Latest saved profile, used to pre-fill the profile form.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<StoredProfile>> {
    let profile = state
        .store
        .get_profile(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("No profile saved yet".to_string()))?;

    Ok(Json(profile))
}

/// Validate and save the profile without generating a plan.
async fn save_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<ProfileForm>, JsonRejection>,
) -> Result<Json<ActionResponse>> {
    let Json(form) = body?;
    state.pipeline.save_profile(&user.user_id, &form).await?;

    Ok(Json(ActionResponse::ok("Profile saved successfully!")))
}
