// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatch loop: walk a routing plan until one candidate answers.
//!
//! Failure handling is deliberately asymmetric. Quota-like rejections and
//! timeouts advance to the next candidate immediately: retrying a
//! rate-limited or unresponsive provider only burns the request deadline.
//! Other failures are treated as transient and retried on the same
//! candidate, with exponential backoff, up to the configured retry cap.

use std::time::Duration;

use letivo_config::model::RoutingConfig;
use letivo_core::{
    AttemptOutcome, ChatMessage, ComplexityTier, LetivoError, NormalizedResponse, ProviderAttempt,
    ProviderRequest,
};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::normalize::normalize;
use crate::plan::build_plan;
use crate::registry::ProviderRegistry;

/// A successful dispatch: the normalized response plus the full attempt
/// trail, including the failures that preceded success.
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    pub response: NormalizedResponse,
    pub attempts: Vec<ProviderAttempt>,
}

/// Dispatches requests across provider chains with timeout, retry, and
/// fallback.
pub struct ProviderRouter {
    registry: ProviderRegistry,
    config: RoutingConfig,
}

impl ProviderRouter {
    pub fn new(registry: ProviderRegistry, config: RoutingConfig) -> Self {
        Self { registry, config }
    }

    /// Walk the tier's candidate chain until one provider answers.
    ///
    /// `module` and `tier` only label logs and the exhaustion error; the
    /// candidate order comes from configuration plus the optional
    /// preferred-provider promotion.
    pub async fn dispatch(
        &self,
        messages: &[ChatMessage],
        module: &str,
        tier: ComplexityTier,
        preferred_provider: Option<&str>,
    ) -> Result<DispatchOutcome, LetivoError> {
        let plan = build_plan(&self.config, tier, preferred_provider);
        let attempt_timeout = Duration::from_secs(self.config.attempt_timeout_secs);
        let mut attempts: Vec<ProviderAttempt> = Vec::new();

        for target in &plan.candidates {
            let Some(provider) = self.registry.get(&target.provider) else {
                warn!(
                    provider = %target.provider,
                    "candidate provider not registered, skipping"
                );
                continue;
            };

            let request = ProviderRequest {
                model: target.model.clone(),
                messages: messages.to_vec(),
                temperature: plan.params.temperature,
                max_tokens: plan.params.max_tokens,
            };

            let mut retries_used: u32 = 0;
            loop {
                let started = Instant::now();
                let result =
                    tokio::time::timeout(attempt_timeout, provider.generate(&request)).await;
                let latency_ms = started.elapsed().as_millis() as u64;

                match result {
                    Ok(Ok(reply)) => {
                        attempts.push(ProviderAttempt {
                            provider: target.provider.clone(),
                            model: target.model.clone(),
                            outcome: AttemptOutcome::Success,
                            latency_ms,
                        });
                        info!(
                            provider = %target.provider,
                            model = %target.model,
                            module = %module,
                            tier = %tier,
                            latency_ms,
                            total_attempts = attempts.len(),
                            "dispatch succeeded"
                        );
                        return Ok(DispatchOutcome {
                            response: normalize(reply, &target.provider, &target.model, latency_ms),
                            attempts,
                        });
                    }
                    Ok(Err(error)) => {
                        attempts.push(ProviderAttempt {
                            provider: target.provider.clone(),
                            model: target.model.clone(),
                            outcome: AttemptOutcome::Error,
                            latency_ms,
                        });
                        if error.is_quota_like() {
                            warn!(
                                provider = %target.provider,
                                model = %target.model,
                                error = %error,
                                "quota-like rejection, advancing to next candidate"
                            );
                            break;
                        }
                        if retries_used >= self.config.max_retries {
                            warn!(
                                provider = %target.provider,
                                model = %target.model,
                                error = %error,
                                "retries exhausted, advancing to next candidate"
                            );
                            break;
                        }
                        let delay =
                            Duration::from_millis(self.config.backoff_base_ms << retries_used);
                        retries_used += 1;
                        warn!(
                            provider = %target.provider,
                            model = %target.model,
                            error = %error,
                            retry = retries_used,
                            delay_ms = delay.as_millis() as u64,
                            "transient provider failure, retrying"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Err(_elapsed) => {
                        attempts.push(ProviderAttempt {
                            provider: target.provider.clone(),
                            model: target.model.clone(),
                            outcome: AttemptOutcome::Timeout,
                            latency_ms,
                        });
                        warn!(
                            provider = %target.provider,
                            model = %target.model,
                            timeout_secs = self.config.attempt_timeout_secs,
                            "attempt timed out, advancing to next candidate"
                        );
                        break;
                    }
                }
            }
        }

        warn!(
            module = %module,
            tier = %tier,
            attempts = attempts.len(),
            "all providers exhausted"
        );
        Err(LetivoError::AllProvidersExhausted {
            module: module.to_string(),
            tier: tier.to_string(),
            attempts: attempts.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use letivo_config::model::RouteTarget;
    use letivo_core::TokenUsage;
    use letivo_test_utils::{MockOutcome, MockProvider};

    use super::*;

    fn test_config(chain: Vec<RouteTarget>) -> RoutingConfig {
        RoutingConfig {
            attempt_timeout_secs: 1,
            max_retries: 1,
            backoff_base_ms: 5,
            trivial: chain.clone(),
            simple: chain.clone(),
            complex: chain,
            ..RoutingConfig::default()
        }
    }

    fn messages() -> Vec<ChatMessage> {
        vec![ChatMessage::user("Qual a capital do Brasil?")]
    }

    fn router_with(
        config: RoutingConfig,
        providers: Vec<Arc<MockProvider>>,
    ) -> ProviderRouter {
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(provider);
        }
        ProviderRouter::new(registry, config)
    }

    #[tokio::test]
    async fn first_candidate_success_makes_one_attempt() {
        let gemini = Arc::new(MockProvider::with_outcomes(
            "gemini",
            vec![MockOutcome::Reply {
                text: "Brasília.".to_string(),
                usage: Some(TokenUsage::new(9, 3)),
            }],
        ));
        let openai = Arc::new(MockProvider::new("openai"));
        let config = test_config(vec![
            RouteTarget::new("gemini", "gemini-2.0-flash"),
            RouteTarget::new("openai", "gpt-4o-mini"),
        ]);
        let router = router_with(config, vec![gemini.clone(), openai.clone()]);

        let outcome = router
            .dispatch(&messages(), "professor", ComplexityTier::Trivial, None)
            .await
            .unwrap();

        assert_eq!(outcome.response.text, "Brasília.");
        assert_eq!(outcome.response.provider, "gemini");
        assert_eq!(outcome.attempts.len(), 1);
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Success);
        assert_eq!(gemini.call_count(), 1);
        assert_eq!(openai.call_count(), 0);
    }

    #[tokio::test]
    async fn quota_rejection_advances_without_retry() {
        let gemini = Arc::new(MockProvider::with_outcomes(
            "gemini",
            vec![MockOutcome::Fail(
                "HTTP 429: You exceeded your current quota".to_string(),
            )],
        ));
        let openai = Arc::new(MockProvider::with_outcomes(
            "openai",
            vec![MockOutcome::Reply {
                text: "ok".to_string(),
                usage: None,
            }],
        ));
        let mut config = test_config(vec![
            RouteTarget::new("gemini", "gemini-2.0-flash"),
            RouteTarget::new("openai", "gpt-4o-mini"),
        ]);
        // Even with retries budgeted, the quota-like failure must not use them.
        config.max_retries = 3;
        let router = router_with(config, vec![gemini.clone(), openai.clone()]);

        let outcome = router
            .dispatch(&messages(), "professor", ComplexityTier::Trivial, None)
            .await
            .unwrap();

        assert_eq!(gemini.call_count(), 1, "no retry on a quota-like failure");
        assert_eq!(outcome.response.provider, "openai");
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Error);
        assert_eq!(outcome.attempts[1].outcome, AttemptOutcome::Success);
    }

    #[tokio::test]
    async fn transient_failure_retries_same_candidate_then_advances() {
        let gemini = Arc::new(MockProvider::with_outcomes(
            "gemini",
            vec![
                MockOutcome::Fail("connection reset by peer".to_string()),
                MockOutcome::Fail("connection reset by peer".to_string()),
            ],
        ));
        let openai = Arc::new(MockProvider::with_outcomes(
            "openai",
            vec![MockOutcome::Reply {
                text: "ok".to_string(),
                usage: None,
            }],
        ));
        let config = test_config(vec![
            RouteTarget::new("gemini", "gemini-2.0-flash"),
            RouteTarget::new("openai", "gpt-4o-mini"),
        ]);
        let router = router_with(config, vec![gemini.clone(), openai.clone()]);

        let outcome = router
            .dispatch(&messages(), "professor", ComplexityTier::Trivial, None)
            .await
            .unwrap();

        // max_retries = 1: original attempt plus one retry.
        assert_eq!(gemini.call_count(), 2);
        assert_eq!(outcome.response.provider, "openai");
        assert_eq!(outcome.attempts.len(), 3);
    }

    #[tokio::test]
    async fn timeout_advances_immediately() {
        let gemini = Arc::new(MockProvider::with_outcomes(
            "gemini",
            vec![MockOutcome::Slow {
                delay: Duration::from_millis(1500),
                text: "too late".to_string(),
            }],
        ));
        let openai = Arc::new(MockProvider::with_outcomes(
            "openai",
            vec![MockOutcome::Reply {
                text: "on time".to_string(),
                usage: None,
            }],
        ));
        let config = test_config(vec![
            RouteTarget::new("gemini", "gemini-2.0-flash"),
            RouteTarget::new("openai", "gpt-4o-mini"),
        ]);
        let router = router_with(config, vec![gemini.clone(), openai.clone()]);

        let outcome = router
            .dispatch(&messages(), "professor", ComplexityTier::Trivial, None)
            .await
            .unwrap();

        assert_eq!(gemini.call_count(), 1, "no retry after a timeout");
        assert_eq!(outcome.response.text, "on time");
        assert_eq!(outcome.attempts[0].outcome, AttemptOutcome::Timeout);
    }

    #[tokio::test]
    async fn all_candidates_failing_yields_exhaustion() {
        let gemini = Arc::new(MockProvider::with_outcomes(
            "gemini",
            vec![MockOutcome::Fail("quota exceeded".to_string())],
        ));
        let openai = Arc::new(MockProvider::with_outcomes(
            "openai",
            vec![
                MockOutcome::Fail("connection reset".to_string()),
                MockOutcome::Fail("connection reset".to_string()),
            ],
        ));
        let config = test_config(vec![
            RouteTarget::new("gemini", "gemini-2.0-flash"),
            RouteTarget::new("openai", "gpt-4o-mini"),
        ]);
        let router = router_with(config, vec![gemini, openai]);

        let err = router
            .dispatch(&messages(), "professor", ComplexityTier::Trivial, None)
            .await
            .unwrap_err();

        match err {
            LetivoError::AllProvidersExhausted {
                module,
                tier,
                attempts,
            } => {
                assert_eq!(module, "professor");
                assert_eq!(tier, "trivial");
                // 1 quota failure + 2 transient failures.
                assert_eq!(attempts, 3);
            }
            other => panic!("expected AllProvidersExhausted, got {other}"),
        }
    }

    #[tokio::test]
    async fn unregistered_candidate_is_skipped() {
        let openai = Arc::new(MockProvider::with_outcomes(
            "openai",
            vec![MockOutcome::Reply {
                text: "ok".to_string(),
                usage: None,
            }],
        ));
        // Gemini is in the chain but never registered (no credentials).
        let config = test_config(vec![
            RouteTarget::new("gemini", "gemini-2.0-flash"),
            RouteTarget::new("openai", "gpt-4o-mini"),
        ]);
        let router = router_with(config, vec![openai.clone()]);

        let outcome = router
            .dispatch(&messages(), "professor", ComplexityTier::Trivial, None)
            .await
            .unwrap();

        assert_eq!(outcome.response.provider, "openai");
        assert_eq!(outcome.attempts.len(), 1);
    }

    #[tokio::test]
    async fn preferred_provider_is_tried_first() {
        let gemini = Arc::new(MockProvider::new("gemini"));
        let grok = Arc::new(MockProvider::with_outcomes(
            "grok",
            vec![MockOutcome::Reply {
                text: "from grok".to_string(),
                usage: None,
            }],
        ));
        let config = test_config(vec![
            RouteTarget::new("gemini", "gemini-2.0-flash"),
            RouteTarget::new("grok", "grok-4-fast"),
        ]);
        let router = router_with(config, vec![gemini.clone(), grok.clone()]);

        let outcome = router
            .dispatch(&messages(), "professor", ComplexityTier::Trivial, Some("grok"))
            .await
            .unwrap();

        assert_eq!(outcome.response.provider, "grok");
        assert_eq!(grok.call_count(), 1);
        assert_eq!(gemini.call_count(), 0, "preferred provider answered first");
    }

    #[tokio::test]
    async fn preferred_provider_failure_falls_back_to_chain() {
        let gemini = Arc::new(MockProvider::with_outcomes(
            "gemini",
            vec![MockOutcome::Reply {
                text: "fallback answer".to_string(),
                usage: None,
            }],
        ));
        let grok = Arc::new(MockProvider::with_outcomes(
            "grok",
            vec![MockOutcome::Fail("rate limit reached".to_string())],
        ));
        let config = test_config(vec![
            RouteTarget::new("gemini", "gemini-2.0-flash"),
            RouteTarget::new("grok", "grok-4-fast"),
        ]);
        let router = router_with(config, vec![gemini.clone(), grok.clone()]);

        let outcome = router
            .dispatch(&messages(), "professor", ComplexityTier::Trivial, Some("grok"))
            .await
            .unwrap();

        assert_eq!(grok.call_count(), 1);
        assert_eq!(outcome.response.text, "fallback answer");
        assert_eq!(outcome.attempts.len(), 2);
    }
}
