// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini `generateContent` endpoint.

use std::time::Duration;

use letivo_core::{ChatRole, LetivoError, ProviderReply, ProviderRequest};
use tracing::debug;

use crate::types::{
    ApiErrorResponse, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    Part, gemini_role,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
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

    /// Issue one generation request.
    pub async fn complete(&self, request: &ProviderRequest) -> Result<ProviderReply, LetivoError> {
        // System messages become the separate systemInstruction block.
        let system_text: Vec<&str> = request
            .messages
            .iter()
            .filter(|m| m.role == ChatRole::System)
            .map(|m| m.content.as_str())
            .collect();
        let system_instruction = (!system_text.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part {
                text: system_text.join("\n"),
            }],
        });

        let contents = request
            .messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| Content {
                role: Some(gemini_role(m.role).to_string()),
                parts: vec![Part {
                    text: m.content.clone(),
                }],
            })
            .collect();

        let body = GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            },
        };

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, request.model
        );
        debug!(model = %request.model, "gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
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
            let message = match serde_json::from_str::<ApiErrorResponse>(&raw) {
                Ok(parsed) => format!("HTTP {status}: {}", parsed.error.message),
                Err(_) => format!("HTTP {status}: {raw}"),
            };
            return Err(LetivoError::provider(message));
        }

        let parsed: GenerateContentResponse =
            response.json().await.map_err(|e| LetivoError::Provider {
                message: format!("malformed generateContent response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .ok_or_else(|| LetivoError::provider("generateContent response had no candidates"))?;

        Ok(ProviderReply {
            text,
            usage: parsed.usage_metadata.map(Into::into),
        })
    }
}
