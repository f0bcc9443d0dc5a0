// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock AI provider with a scripted outcome queue.
//!
//! Each call to `generate` consumes the next scripted outcome, so tests
//! can drive the dispatch loop through success, provider errors, and slow
//! responses deterministically. When the queue is empty the provider
//! returns a fixed success, which keeps simple tests short.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use letivo_core::{
    AdapterType, HealthStatus, LetivoError, PluginAdapter, ProviderAdapter, ProviderReply,
    ProviderRequest, TokenUsage,
};
use tokio::sync::Mutex;

/// One scripted behavior for a `generate` call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Reply with this text and usage.
    Reply { text: String, usage: Option<TokenUsage> },
    /// Fail with a provider error carrying this message.
    Fail(String),
    /// Sleep for this long, then reply. Used to trigger dispatch timeouts
    /// and to widen in-flight windows in de-duplication tests.
    Slow { delay: Duration, text: String },
}

/// Mock implementation of [`ProviderAdapter`] for tests.
pub struct MockProvider {
    name: String,
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    calls: AtomicU64,
}

impl MockProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcomes: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicU64::new(0),
        }
    }

    /// Create a provider pre-loaded with outcomes.
    pub fn with_outcomes(name: &str, outcomes: Vec<MockOutcome>) -> Self {
        Self {
            name: name.to_string(),
            outcomes: Arc::new(Mutex::new(outcomes.into())),
            calls: AtomicU64::new(0),
        }
    }

    /// Append an outcome to the script.
    pub async fn push(&self, outcome: MockOutcome) {
        self.outcomes.lock().await.push_back(outcome);
    }

    /// Shorthand: script a plain successful reply.
    pub async fn push_reply(&self, text: &str, usage: Option<TokenUsage>) {
        self.push(MockOutcome::Reply {
            text: text.to_string(),
            usage,
        })
        .await;
    }

    /// Shorthand: script a failure with the given error message.
    pub async fn push_failure(&self, message: &str) {
        self.push(MockOutcome::Fail(message.to_string())).await;
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
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
impl ProviderAdapter for MockProvider {
    async fn generate(&self, _request: &ProviderRequest) -> Result<ProviderReply, LetivoError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self.outcomes.lock().await.pop_front();
        match outcome {
            Some(MockOutcome::Reply { text, usage }) => Ok(ProviderReply { text, usage }),
            Some(MockOutcome::Fail(message)) => Err(LetivoError::provider(message)),
            Some(MockOutcome::Slow { delay, text }) => {
                tokio::time::sleep(delay).await;
                Ok(ProviderReply { text, usage: None })
            }
            None => Ok(ProviderReply {
                text: "mock response".to_string(),
                usage: Some(TokenUsage::new(10, 5)),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ProviderRequest {
        ProviderRequest {
            model: "mock-model".to_string(),
            messages: vec![letivo_core::ChatMessage::user("oi")],
            temperature: 0.5,
            max_tokens: 64,
        }
    }

    #[tokio::test]
    async fn empty_queue_returns_default_reply() {
        let provider = MockProvider::new("mock");
        let reply = provider.generate(&request()).await.unwrap();
        assert_eq!(reply.text, "mock response");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn outcomes_are_consumed_in_order() {
        let provider = MockProvider::new("mock");
        provider.push_reply("first", None).await;
        provider.push_failure("quota exceeded").await;
        provider.push_reply("third", None).await;

        assert_eq!(provider.generate(&request()).await.unwrap().text, "first");
        let err = provider.generate(&request()).await.unwrap_err();
        assert!(err.is_quota_like());
        assert_eq!(provider.generate(&request()).await.unwrap().text, "third");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn slow_outcome_sleeps_then_replies() {
        let provider = MockProvider::new("mock");
        provider
            .push(MockOutcome::Slow {
                delay: Duration::from_millis(20),
                text: "late".to_string(),
            })
            .await;

        let started = std::time::Instant::now();
        let reply = provider.generate(&request()).await.unwrap();
        assert_eq!(reply.text, "late");
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
