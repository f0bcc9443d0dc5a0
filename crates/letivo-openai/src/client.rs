// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat-completions endpoints.
//!
//! One call per invocation: the dispatch loop owns retry, backoff, and
//! timeout policy, so the client maps every non-success status into a
//! `LetivoError::Provider` whose message preserves the upstream wording.
//! Quota and rate-limit rejections stay recognizable downstream.

use std::time::Duration;

use letivo_core::{LetivoError, ProviderReply, ProviderRequest};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse, WireMessage};

/// Backstop for a single HTTP exchange; the router enforces the real
/// per-attempt deadline.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for any endpoint speaking the chat-completions protocol.
///
/// Parameterized by base URL so the OpenAI, Grok, and Perplexity adapters
/// share one implementation.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ChatCompletionsClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self, LetivoError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| LetivoError::Provider {
                message: "failed to build HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url,
        })
    }

    /// Override the base URL for tests.
    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Issue one completion request.
    pub async fn complete(&self, request: &ProviderRequest) -> Result<ProviderReply, LetivoError> {
        let body = ChatCompletionRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %request.model, url = %self.base_url, "chat completion request");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LetivoError::Provider {
                message: format!("request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            // Prefer the API's own error message; it carries the quota /
            // rate-limit wording the dispatch loop matches on.
            let message = match serde_json::from_str::<ApiErrorResponse>(&raw) {
                Ok(parsed) => format!("HTTP {status}: {}", parsed.error.message),
                Err(_) => format!("HTTP {status}: {raw}"),
            };
            return Err(LetivoError::provider(message));
        }

        let parsed: ChatCompletionResponse =
            response.json().await.map_err(|e| LetivoError::Provider {
                message: format!("malformed completion response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LetivoError::provider("completion response had no choices"))?;

        Ok(ProviderReply {
            text,
            usage: parsed.usage.map(Into::into),
        })
    }
}
