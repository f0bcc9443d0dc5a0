// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! xAI Grok provider adapter.
//!
//! Grok exposes the chat-completions protocol, so this is the shared
//! [`ChatCompletionsClient`] pointed at the xAI endpoint.

use async_trait::async_trait;
use letivo_config::model::ProviderCredentials;
use letivo_core::{
    AdapterType, HealthStatus, LetivoError, PluginAdapter, ProviderAdapter, ProviderReply,
    ProviderRequest,
};
use letivo_openai::{ChatCompletionsClient, resolve_api_key};

const GROK_BASE_URL: &str = "https://api.x.ai/v1";
const GROK_KEY_ENV: &str = "XAI_API_KEY";

/// The xAI Grok text-generation provider.
pub struct GrokProvider {
    client: ChatCompletionsClient,
}

impl GrokProvider {
    pub fn new(credentials: &ProviderCredentials) -> Result<Self, LetivoError> {
        let api_key = resolve_api_key(credentials, GROK_KEY_ENV)?;
        let client = ChatCompletionsClient::new(api_key, GROK_BASE_URL.to_string())?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for GrokProvider {
    fn name(&self) -> &str {
        "grok"
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
impl ProviderAdapter for GrokProvider {
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderReply, LetivoError> {
        self.client.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_fails_construction() {
        let credentials = ProviderCredentials { api_key: None };
        // Guard against ambient XAI_API_KEY leaking into the test.
        if std::env::var(GROK_KEY_ENV).is_ok() {
            return;
        }
        assert!(GrokProvider::new(&credentials).is_err());
    }

    #[test]
    fn adapter_identity() {
        let credentials = ProviderCredentials {
            api_key: Some("k".to_string()),
        };
        let provider = GrokProvider::new(&credentials).unwrap();
        assert_eq!(provider.name(), "grok");
        assert_eq!(provider.adapter_type(), AdapterType::Provider);
    }
}
