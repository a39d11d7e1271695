// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! FitPlan API Server
//!
//! Turns a user's health profile into a personalized diet and workout plan
//! and keeps track of their daily progress.

use fitplan::{
    config::{Config, StorageBackend},
    db::{FirestoreDb, MemoryStore, PlanStore},
    services::{GeminiClient, PlanGenerator, PlanPipeline},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting FitPlan API");

    // Initialize storage
    let store: Arc<dyn PlanStore> = match config.storage_backend {
        StorageBackend::Firestore => Arc::new(FirestoreDb::new(&config.gcp_project_id).await?),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    // Initialize language model client
    let gemini = GeminiClient::from_config(&config);
    tracing::info!(
        model = %config.gemini_model,
        timeout_secs = config.llm_timeout.as_secs(),
        "Gemini client initialized"
    );
    let pipeline = PlanPipeline::new(store.clone(), PlanGenerator::new(Arc::new(gemini)));

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        store,
        pipeline,
    });

    // Build router
    let app = fitplan::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fitplan=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
