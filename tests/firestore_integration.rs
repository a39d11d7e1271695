// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running.
//! Start it with `gcloud emulators firestore start` and export
//! FIRESTORE_EMULATOR_HOST; otherwise every test is skipped.
//!
//! Each test uses fresh user IDs, so runs against a shared emulator do not
//! interfere with each other.

use chrono::NaiveDate;
use fitplan::db::PlanStore;
use fitplan::error::AppError;
use fitplan::models::{ActivityLevel, Gender, PlanOutput, ProfileInput, ProgressLogEntry};

mod common;
use common::test_db;

/// Generate a unique user ID for test isolation.
fn unique_user_id() -> String {
    format!("test-user-{}", uuid::Uuid::new_v4())
}

fn profile() -> ProfileInput {
    ProfileInput {
        age: 30,
        height: 175.0,
        weight: 70.0,
        gender: Gender::Male,
        activity_level: ActivityLevel::ModeratelyActive,
        preferred_cuisine: "Italian".to_string(),
        diet_preferences: "none".to_string(),
        health_goals: "lose 5kg".to_string(),
        health_issues: None,
    }
}

fn output(tag: &str) -> PlanOutput {
    PlanOutput {
        diet_plan: format!("diet {}", tag),
        workout_plan: format!("workout {}", tag),
    }
}

fn entry(date: &str) -> ProgressLogEntry {
    ProgressLogEntry {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        weight: Some(70.5),
        workout_completed: Some(true),
        arm_circumference: None,
        chest_circumference: Some(98.0),
        waist_circumference: None,
        workout_summary: Some("intervals".to_string()),
        mood: None,
        notes: None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// PROFILE TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_profile_upsert_replaces() {
    require_emulator!();

    let db = test_db().await;
    let user = unique_user_id();

    assert!(db.get_profile(&user).await.unwrap().is_none());

    db.upsert_profile(&user, &profile()).await.unwrap();

    let mut changed = profile();
    changed.weight = 68.0;
    changed.health_issues = Some("asthma".to_string());
    db.upsert_profile(&user, &changed).await.unwrap();

    let stored = db.get_profile(&user).await.unwrap().unwrap();
    assert_eq!(stored.user_id, user);
    assert_eq!(stored.profile, changed);
}

// ═══════════════════════════════════════════════════════════════════════════
// PLAN TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_plan_round_trip_and_isolation() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_user_id();
    let other = unique_user_id();

    let plan = db.insert_plan(&owner, &profile(), &output("a")).await.unwrap();

    let fetched = db.get_plan(&owner, &plan.id).await.unwrap();
    assert_eq!(fetched.id, plan.id);
    assert_eq!(fetched.inputs, plan.inputs);
    assert_eq!(fetched.output(), output("a"));

    assert!(matches!(
        db.get_plan(&other, &plan.id).await,
        Err(AppError::NotFound(_))
    ));
    assert!(db.list_plans(&other).await.unwrap().is_empty());
    assert!(matches!(
        db.delete_plan(&other, &plan.id).await,
        Err(AppError::NotFound(_))
    ));

    db.delete_plan(&owner, &plan.id).await.unwrap();
    assert!(db.list_plans(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_plans_newest_first() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_user_id();

    let first = db.insert_plan(&owner, &profile(), &output("1")).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let second = db.insert_plan(&owner, &profile(), &output("2")).await.unwrap();

    let ids: Vec<String> = db
        .list_plans(&owner)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

// ═══════════════════════════════════════════════════════════════════════════
// PROGRESS LOG TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_progress_log_conflict_then_upsert() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_user_id();

    let created = db
        .insert_progress_log(&owner, &entry("2026-02-01"))
        .await
        .unwrap();

    let err = db
        .insert_progress_log(&owner, &entry("2026-02-01"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "{err}");

    let mut changed = entry("2026-02-01");
    changed.mood = Some("tired".to_string());
    let updated = db.upsert_progress_log(&owner, &changed).await.unwrap();
    assert_eq!(updated.id, created.id);

    let fetched = db
        .get_progress_log(&owner, changed.date)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.entry, changed);

    // Fields left out of an edit keep their stored values
    let mut partial = entry("2026-02-01");
    partial.weight = Some(69.9);
    partial.workout_summary = None;
    let updated = db.upsert_progress_log(&owner, &partial).await.unwrap();
    assert_eq!(updated.entry.workout_summary.as_deref(), Some("intervals"));
    assert_eq!(updated.entry.mood.as_deref(), Some("tired"));
}

#[tokio::test]
async fn test_progress_logs_by_date_and_delete() {
    require_emulator!();

    let db = test_db().await;
    let owner = unique_user_id();

    for date in ["2026-02-10", "2026-01-31", "2026-02-03"] {
        db.insert_progress_log(&owner, &entry(date)).await.unwrap();
    }

    let dates: Vec<String> = db
        .list_progress_logs(&owner)
        .await
        .unwrap()
        .iter()
        .map(|l| l.entry.date.to_string())
        .collect();
    assert_eq!(dates, vec!["2026-01-31", "2026-02-03", "2026-02-10"]);

    let date = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
    db.delete_progress_log(&owner, date).await.unwrap();
    assert!(db.get_progress_log(&owner, date).await.unwrap().is_none());
    assert!(matches!(
        db.delete_progress_log(&owner, date).await,
        Err(AppError::NotFound(_))
    ));
}
