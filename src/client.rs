// Copyright 2026 The parley authors
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Remote inference client speaking the native Ollama HTTP API.
//!
//! Two endpoints are used:
//!
//! - `POST /api/chat` - single non-streaming chat completion
//! - `GET /api/tags` - registered model listing
//!
//! The client is a pure translation layer: no retries, no internal state
//! beyond the HTTP connection pool. Retries, if desired, are a caller concern.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::InferenceError;
use crate::types::{ChatMessage, ModelDescriptor};

/// Default Ollama base URL.
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Trait for issuing chat and model-listing requests.
///
/// The dispatcher and the plain-chat path consume this seam, so tests can
/// substitute a scripted client.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send one non-streaming chat request and return the assistant text.
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, InferenceError>;

    /// List the models registered on the server.
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, InferenceError>;
}

/// HTTP client for a locally running Ollama server.
pub struct OllamaClient {
    client: Client,
    base_url: String,
}

impl OllamaClient {
    /// Create a client against the default endpoint.
    pub fn new() -> Self {
        Self::with_base_url(OLLAMA_BASE_URL)
    }

    /// Create a client against a custom endpoint.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { client, base_url }
    }

    /// The configured endpoint.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, InferenceError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            stream: false,
        };

        debug!(model, messages = messages.len(), "Sending chat request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::api(error_text, status.as_u16()));
        }

        let api_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Parse(e.to_string()))?;

        debug!(model = %api_response.model, done = api_response.done, "Chat response received");

        Ok(api_response.message.content)
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, InferenceError> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| InferenceError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(InferenceError::api(error_text, status.as_u16()));
        }

        let tags: TagsResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Parse(e.to_string()))?;

        Ok(tags.models)
    }
}

// ============================================================================
// API Types
// ============================================================================

/// Request body for `POST /api/chat`.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
}

/// Response body from `POST /api/chat`.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    model: String,
    #[allow(dead_code)]
    created_at: String,
    message: ResponseMessage,
    done: bool,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[allow(dead_code)]
    role: String,
    content: String,
}

/// Response body from `GET /api/tags`. A body without a `models` field is a
/// parse failure, not an empty list.
#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<ModelDescriptor>,
}
