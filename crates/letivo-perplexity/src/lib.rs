// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Perplexity provider adapter.
//!
//! Perplexity exposes the chat-completions protocol, so this is the shared
//! [`ChatCompletionsClient`] pointed at the Perplexity endpoint.

use async_trait::async_trait;
use letivo_config::model::ProviderCredentials;
use letivo_core::{
    AdapterType, HealthStatus, LetivoError, PluginAdapter, ProviderAdapter, ProviderReply,
    ProviderRequest,
};
use letivo_openai::{ChatCompletionsClient, resolve_api_key};

const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";
const PERPLEXITY_KEY_ENV: &str = "PERPLEXITY_API_KEY";

/// The Perplexity text-generation provider.
pub struct PerplexityProvider {
    client: ChatCompletionsClient,
}

impl PerplexityProvider {
    pub fn new(credentials: &ProviderCredentials) -> Result<Self, LetivoError> {
        let api_key = resolve_api_key(credentials, PERPLEXITY_KEY_ENV)?;
        let client = ChatCompletionsClient::new(api_key, PERPLEXITY_BASE_URL.to_string())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for PerplexityProvider {
    fn name(&self) -> &str {
        "perplexity"
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
impl ProviderAdapter for PerplexityProvider {
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderReply, LetivoError> {
        self.client.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_identity() {
        let credentials = ProviderCredentials {
            api_key: Some("k".to_string()),
        };
        let provider = PerplexityProvider::new(&credentials).unwrap();
        assert_eq!(provider.name(), "perplexity");
    }
}
