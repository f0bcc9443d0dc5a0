// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter.

pub mod client;
pub mod types;

use async_trait::async_trait;
use letivo_config::model::ProviderCredentials;
use letivo_core::{
    AdapterType, HealthStatus, LetivoError, PluginAdapter, ProviderAdapter, ProviderReply,
    ProviderRequest,
};

pub use client::GeminiClient;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// The Google Gemini text-generation provider.
pub struct GeminiProvider {
    client: GeminiClient,
}

impl GeminiProvider {
    pub fn new(credentials: &ProviderCredentials) -> Result<Self, LetivoError> {
        let api_key = resolve_api_key(credentials)?;
        let client = GeminiClient::new(api_key, GEMINI_BASE_URL.to_string())?;
        Ok(Self { client })
    }
}

fn resolve_api_key(credentials: &ProviderCredentials) -> Result<String, LetivoError> {
    if let Some(key) = &credentials.api_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }
    if let Ok(key) = std::env::var(GEMINI_KEY_ENV)
        && !key.is_empty()
    {
        return Ok(key);
    }
    Err(LetivoError::Config(format!(
        "no API key configured (set api_key in config or the {GEMINI_KEY_ENV} environment variable)"
    )))
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, LetivoError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LetivoError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderReply, LetivoError> {
        self.client.complete(request).await
    }
}
