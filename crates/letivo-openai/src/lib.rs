// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI provider adapter.
//!
//! Also exports [`ChatCompletionsClient`] and the wire types, which the
//! Grok and Perplexity adapters reuse: both vendors expose the same
//! chat-completions protocol under a different base URL.

pub mod client;
pub mod types;

use async_trait::async_trait;
use letivo_config::model::ProviderCredentials;
use letivo_core::{
    AdapterType, HealthStatus, LetivoError, PluginAdapter, ProviderAdapter, ProviderReply,
    ProviderRequest,
};

pub use client::ChatCompletionsClient;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENAI_KEY_ENV: &str = "OPENAI_API_KEY";

/// Resolve an API key: explicit config value first, then the environment
/// variable, otherwise an error naming both places.
pub fn resolve_api_key(
    credentials: &ProviderCredentials,
    env_var: &str,
) -> Result<String, LetivoError> {
    if let Some(key) = &credentials.api_key
        && !key.is_empty()
    {
        return Ok(key.clone());
    }
    if let Ok(key) = std::env::var(env_var)
        && !key.is_empty()
    {
        return Ok(key);
    }
    Err(LetivoError::Config(format!(
        "no API key configured (set api_key in config or the {env_var} environment variable)"
    )))
}

/// The OpenAI text-generation provider.
pub struct OpenAiProvider {
    client: ChatCompletionsClient,
}

impl OpenAiProvider {
    pub fn new(credentials: &ProviderCredentials) -> Result<Self, LetivoError> {
        let api_key = resolve_api_key(credentials, OPENAI_KEY_ENV)?;
        let client = ChatCompletionsClient::new(api_key, OPENAI_BASE_URL.to_string())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, LetivoError> {
        // Key presence is checked at construction; no billable probe.
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), LetivoError> {
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for OpenAiProvider {
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderReply, LetivoError> {
        self.client.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_key_wins_over_env() {
        let credentials = ProviderCredentials {
            api_key: Some("from-config".to_string()),
        };
        let key = resolve_api_key(&credentials, "LETIVO_TEST_NONEXISTENT_VAR").unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn empty_config_key_is_ignored() {
        let credentials = ProviderCredentials {
            api_key: Some(String::new()),
        };
        let err = resolve_api_key(&credentials, "LETIVO_TEST_NONEXISTENT_VAR").unwrap_err();
        assert!(err.to_string().contains("LETIVO_TEST_NONEXISTENT_VAR"));
    }

    #[test]
    fn missing_key_errors_with_guidance() {
        let credentials = ProviderCredentials { api_key: None };
        let err = resolve_api_key(&credentials, "LETIVO_TEST_NONEXISTENT_VAR").unwrap_err();
        assert!(matches!(err, LetivoError::Config(_)));
    }
}
