// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Language model client.
//!
//! Handles:
//! - Structured (JSON schema constrained) generation via Gemini `generateContent`
//! - Bounded call timeout
//! - Mapping transport, HTTP and payload failures to [`GenerationError`]
//!
//! No retries happen here; callers decide whether to try again.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

use crate::config::Config;

/// Longest backend error body echoed into an error message.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Why a model call produced no usable output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("model backend unreachable: {0}")]
    Unreachable(String),

    #[error("model backend returned HTTP {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("model response did not match the expected shape: {0}")]
    Malformed(String),

    #[error("model call timed out after {0:?}")]
    Timeout(Duration),
}

/// A backend able to answer a prompt with JSON matching a response schema.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send `prompt` and return the raw JSON text of the answer.
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError>;
}

// ─── Gemini Wire Types ───────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ─── Gemini Client ───────────────────────────────────────────

/// Google Gemini client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.llm_base_url.clone(),
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            config.llm_timeout,
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    /// One request/response exchange, without the timeout.
    async fn exchange(&self, body: &GenerateContentRequest<'_>) -> Result<String, GenerationError> {
        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), model = %self.model, "Gemini API error");
            return Err(GenerationError::Rejected {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        extract_text(&text)
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.timeout)
        } else {
            GenerationError::Unreachable(err.to_string())
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate_json(&self, prompt: &str, schema: &Value) -> Result<String, GenerationError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            },
        };

        tokio::time::timeout(self.timeout, self.exchange(&body))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))?
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

/// Pull the answer text out of a `generateContent` response body.
fn extract_text(body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::Malformed(format!("invalid response envelope: {}", e)))?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(GenerationError::Malformed(format!("prompt blocked: {}", reason)));
    }

    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| GenerationError::Malformed("no candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.trim().is_empty() {
        return Err(GenerationError::Malformed(format!(
            "empty candidate (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

/// Best-effort message from an error body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.chars().take(MAX_ERROR_BODY_CHARS).collect())
}
