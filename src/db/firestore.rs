// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides owner-scoped operations for:
//! - Profiles (latest profile per user)
//! - Generated plans
//! - Progress logs (one document per user per day)

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use firestore::errors::FirestoreError;
use serde::{Deserialize, Serialize};

use crate::db::{
    collections, plan_not_found, progress_log_id, progress_log_not_found, require_owner,
    PlanStore,
};
use crate::error::AppError;
use crate::models::{
    GeneratedPlan, PlanOutput, ProfileInput, ProgressLog, ProgressLogEntry, StoredProfile,
};

// ─── Document Types ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileDocument {
    user_id: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    updated_at: DateTime<Utc>,
    profile: ProfileInput,
}

impl From<ProfileDocument> for StoredProfile {
    fn from(doc: ProfileDocument) -> Self {
        StoredProfile {
            user_id: doc.user_id,
            updated_at: doc.updated_at,
            profile: doc.profile,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanDocument {
    id: String,
    user_id: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    created_at: DateTime<Utc>,
    inputs: ProfileInput,
    diet_plan: String,
    workout_plan: String,
}

impl From<&GeneratedPlan> for PlanDocument {
    fn from(plan: &GeneratedPlan) -> Self {
        PlanDocument {
            id: plan.id.clone(),
            user_id: plan.user_id.clone(),
            created_at: plan.created_at,
            inputs: plan.inputs.clone(),
            diet_plan: plan.diet_plan.clone(),
            workout_plan: plan.workout_plan.clone(),
        }
    }
}

impl From<PlanDocument> for GeneratedPlan {
    fn from(doc: PlanDocument) -> Self {
        GeneratedPlan {
            id: doc.id,
            user_id: doc.user_id,
            created_at: doc.created_at,
            inputs: doc.inputs,
            diet_plan: doc.diet_plan,
            workout_plan: doc.workout_plan,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressLogDocument {
    id: String,
    user_id: String,
    #[serde(with = "firestore::serialize_as_timestamp")]
    created_at: DateTime<Utc>,
    /// Duplicated out of `entry` so it can be filtered on
    date: NaiveDate,
    entry: ProgressLogEntry,
}

impl From<&ProgressLog> for ProgressLogDocument {
    fn from(log: &ProgressLog) -> Self {
        ProgressLogDocument {
            id: log.id.clone(),
            user_id: log.user_id.clone(),
            created_at: log.created_at,
            date: log.entry.date,
            entry: log.entry.clone(),
        }
    }
}

impl From<ProgressLogDocument> for ProgressLog {
    fn from(doc: ProgressLogDocument) -> Self {
        ProgressLog {
            id: doc.id,
            user_id: doc.user_id,
            created_at: doc.created_at,
            entry: doc.entry,
        }
    }
}

fn db_error(e: FirestoreError) -> AppError {
    AppError::Database(e.to_string())
}

// ─── Client ──────────────────────────────────────────────────

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    async fn get_plan_document(&self, plan_id: &str) -> Result<Option<PlanDocument>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::GENERATED_PLANS)
            .obj()
            .one(plan_id)
            .await
            .map_err(db_error)
    }

    async fn get_progress_document(
        &self,
        owner: &str,
        date: NaiveDate,
    ) -> Result<Option<ProgressLogDocument>, AppError> {
        let doc: Option<ProgressLogDocument> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROGRESS_LOGS)
            .obj()
            .one(&progress_log_id(owner, date))
            .await
            .map_err(db_error)?;

        Ok(doc.filter(|d| d.user_id == owner))
    }

    async fn write_progress_document(&self, doc: &ProgressLogDocument) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROGRESS_LOGS)
            .document_id(progress_log_id(&doc.user_id, doc.date))
            .object(doc)
            .execute()
            .await
            .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl PlanStore for FirestoreDb {
    // ─── Profile Operations ──────────────────────────────────────

    async fn upsert_profile(
        &self,
        owner: &str,
        profile: &ProfileInput,
    ) -> Result<StoredProfile, AppError> {
        let owner = require_owner(owner)?;
        let doc = ProfileDocument {
            user_id: owner.to_string(),
            updated_at: Utc::now(),
            profile: profile.clone(),
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::PROFILES)
            .document_id(urlencoding::encode(owner).into_owned())
            .object(&doc)
            .execute()
            .await
            .map_err(db_error)?;

        Ok(doc.into())
    }

    async fn get_profile(&self, owner: &str) -> Result<Option<StoredProfile>, AppError> {
        let owner = require_owner(owner)?;
        let doc_id = urlencoding::encode(owner).into_owned();
        let doc: Option<ProfileDocument> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::PROFILES)
            .obj()
            .one(&doc_id)
            .await
            .map_err(db_error)?;

        Ok(doc.filter(|d| d.user_id == owner).map(Into::into))
    }

    // ─── Plan Operations ─────────────────────────────────────────

    async fn insert_plan(
        &self,
        owner: &str,
        inputs: &ProfileInput,
        output: &PlanOutput,
    ) -> Result<GeneratedPlan, AppError> {
        let owner = require_owner(owner)?;
        let plan = GeneratedPlan::new(owner, inputs, output, Utc::now());

        let _: PlanDocument = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::GENERATED_PLANS)
            .document_id(&plan.id)
            .object(&PlanDocument::from(&plan))
            .execute()
            .await
            .map_err(db_error)?;

        tracing::debug!(plan_id = %plan.id, "Stored generated plan");
        Ok(plan)
    }

    async fn list_plans(&self, owner: &str) -> Result<Vec<GeneratedPlan>, AppError> {
        let owner = require_owner(owner)?;
        let docs: Vec<PlanDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::GENERATED_PLANS)
            .filter(|q| q.for_all([q.field("userId").eq(owner)]))
            .obj()
            .query()
            .await
            .map_err(db_error)?;

        // Sorted here rather than in the query to avoid a composite index
        let mut plans: Vec<GeneratedPlan> = docs.into_iter().map(Into::into).collect();
        plans.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(plans)
    }

    async fn get_plan(&self, owner: &str, plan_id: &str) -> Result<GeneratedPlan, AppError> {
        let owner = require_owner(owner)?;
        self.get_plan_document(plan_id)
            .await?
            .filter(|d| d.user_id == owner)
            .map(Into::into)
            .ok_or_else(|| plan_not_found(plan_id))
    }

    async fn delete_plan(&self, owner: &str, plan_id: &str) -> Result<(), AppError> {
        let owner = require_owner(owner)?;
        if self
            .get_plan_document(plan_id)
            .await?
            .filter(|d| d.user_id == owner)
            .is_none()
        {
            return Err(plan_not_found(plan_id));
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::GENERATED_PLANS)
            .document_id(plan_id)
            .execute()
            .await
            .map_err(db_error)?;

        tracing::debug!(plan_id, "Deleted plan");
        Ok(())
    }

    // ─── Progress Log Operations ─────────────────────────────────

    async fn insert_progress_log(
        &self,
        owner: &str,
        entry: &ProgressLogEntry,
    ) -> Result<ProgressLog, AppError> {
        let owner = require_owner(owner)?;
        let log = ProgressLog::new(owner, entry.clone(), Utc::now());

        // Create fails if the document exists, which keeps (owner, date) unique
        let result: Result<ProgressLogDocument, FirestoreError> = self
            .get_client()?
            .fluent()
            .insert()
            .into(collections::PROGRESS_LOGS)
            .document_id(progress_log_id(owner, entry.date))
            .object(&ProgressLogDocument::from(&log))
            .execute()
            .await;

        match result {
            Ok(_) => Ok(log),
            Err(FirestoreError::DataConflictError(_)) => Err(AppError::Conflict(
                AppError::PROGRESS_LOG_EXISTS.to_string(),
            )),
            Err(e) => Err(db_error(e)),
        }
    }

    async fn upsert_progress_log(
        &self,
        owner: &str,
        entry: &ProgressLogEntry,
    ) -> Result<ProgressLog, AppError> {
        let owner = require_owner(owner)?;
        let log = match self.get_progress_document(owner, entry.date).await? {
            Some(existing) => {
                let existing = ProgressLog::from(existing);
                ProgressLog {
                    entry: entry.merged_over(&existing.entry),
                    ..existing
                }
            }
            None => ProgressLog::new(owner, entry.clone(), Utc::now()),
        };

        self.write_progress_document(&ProgressLogDocument::from(&log))
            .await?;
        Ok(log)
    }

    async fn list_progress_logs(&self, owner: &str) -> Result<Vec<ProgressLog>, AppError> {
        let owner = require_owner(owner)?;
        let docs: Vec<ProgressLogDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::PROGRESS_LOGS)
            .filter(|q| q.for_all([q.field("userId").eq(owner)]))
            .obj()
            .query()
            .await
            .map_err(db_error)?;

        let mut logs: Vec<ProgressLog> = docs.into_iter().map(Into::into).collect();
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
            .get_progress_document(owner, date)
            .await?
            .map(Into::into))
    }

    async fn delete_progress_log(&self, owner: &str, date: NaiveDate) -> Result<(), AppError> {
        let owner = require_owner(owner)?;
        if self.get_progress_document(owner, date).await?.is_none() {
            return Err(progress_log_not_found(date));
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::PROGRESS_LOGS)
            .document_id(progress_log_id(owner, date))
            .execute()
            .await
            .map_err(db_error)?;
        Ok(())
    }
}
