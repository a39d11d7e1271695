// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::services::llm::GenerationError;
use crate::validation::{FieldError, ValidationError};

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Shown when a progress log already exists for the requested day.
    pub const PROGRESS_LOG_EXISTS: &'static str =
        "A log for this date already exists. You can edit the existing log or choose a different date.";

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized => "unauthorized",
            AppError::InvalidToken => "invalid_token",
            AppError::Validation(_) => "validation_error",
            AppError::Generation(GenerationError::Timeout(_)) => "generation_timeout",
            AppError::Generation(_) => "generation_error",
            AppError::Conflict(_) => "conflict",
            AppError::NotFound(_) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Database(_) => "database_error",
            AppError::Internal(_) => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Generation(GenerationError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Generation(_) => StatusCode::BAD_GATEWAY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Vec<FieldError>>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = self.code();

        let (message, details, fields) = match self {
            AppError::Unauthorized => ("Authentication required.".to_string(), None, None),
            AppError::InvalidToken => ("Invalid or expired token.".to_string(), None, None),
            AppError::Validation(err) => (
                "Please correct the highlighted fields.".to_string(),
                None,
                Some(err.fields),
            ),
            AppError::Generation(err) => (
                "The AI service could not complete the request. Please try again.".to_string(),
                Some(err.to_string()),
                None,
            ),
            AppError::Conflict(msg) => (msg, None, None),
            AppError::NotFound(msg) => ("Not found.".to_string(), Some(msg), None),
            AppError::BadRequest(msg) => ("Invalid request.".to_string(), Some(msg), None),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                ("Failed to access stored data.".to_string(), None, None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                ("Internal server error.".to_string(), None, None)
            }
        };

        let body = ErrorResponse {
            error,
            message,
            details,
            fields,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
