// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Progress routes: daily logs keyed by date, and report summaries.

use crate::db::progress_log_not_found;
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::{ProgressLog, ProgressSummary};
use crate::routes::ActionResponse;
use crate::validation::{parse_log_date, validate_progress_log, ProgressLogForm, ReportForm};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/progress", get(list_logs).post(create_log))
        .route("/api/progress/summary", post(summarize))
        .route(
            "/api/progress/{date}",
            get(get_log).put(save_log).delete(delete_log),
        )
}

/// All of the caller's logs, oldest date first.
async fn list_logs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ProgressLog>>> {
    Ok(Json(state.store.list_progress_logs(&user.user_id).await?))
}

/// Create a new log. Fails with 409 if the day already has one.
async fn create_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: std::result::Result<Json<ProgressLogForm>, JsonRejection>,
) -> Result<(StatusCode, Json<ActionResponse>)> {
    let Json(form) = body?;
    let entry = validate_progress_log(&form)?;
    state
        .store
        .insert_progress_log(&user.user_id, &entry)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ActionResponse::ok("Progress log saved successfully!")),
    ))
}

async fn get_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<ProgressLog>> {
    let date = parse_log_date(&date)?;
    state
        .store
        .get_progress_log(&user.user_id, date)
        .await?
        .map(Json)
        .ok_or_else(|| progress_log_not_found(date))
}

/// Create or update the log for the day in the path.
async fn save_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
    body: std::result::Result<Json<ProgressLogForm>, JsonRejection>,
) -> Result<Json<ActionResponse>> {
    let Json(mut form) = body?;
    // The path names the log being edited
    form.date = Some(Value::String(date));
    let entry = validate_progress_log(&form)?;

    state
        .store
        .upsert_progress_log(&user.user_id, &entry)
        .await?;
    Ok(Json(ActionResponse::ok("Progress log saved successfully!")))
}

async fn delete_log(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(date): Path<String>,
) -> Result<Json<ActionResponse>> {
    let date = parse_log_date(&date)?;
    state
        .store
        .delete_progress_log(&user.user_id, date)
        .await?;
    Ok(Json(ActionResponse::ok("Progress log deleted successfully!")))
}

/// Summarize a free-text progress report. Nothing is stored.
async fn summarize(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    body: std::result::Result<Json<ReportForm>, JsonRejection>,
) -> Result<Json<ProgressSummary>> {
    let Json(form) = body?;
    Ok(Json(state.pipeline.summarize_progress(&form).await?))
}
