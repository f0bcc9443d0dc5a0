// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end request orchestration.
//!
//! One request flows validate -> quota check -> classify -> estimate ->
//! dispatch -> commit. The quota check is fail-closed: a storage error
//! refuses the request without dispatching. The usage commit is the
//! opposite, fire-and-forget: the user already has their answer, so a
//! failed bookkeeping write is logged and dropped rather than turned into
//! a late error. The spawned commit also survives the caller disconnecting
//! mid-response.

use std::sync::Arc;

use letivo_classifier::{ComplexityEstimator, ModuleClassifier};
use letivo_core::{
    ChatMessage, ClassificationResult, ComplexityTier, LetivoError, NormalizedResponse,
    ProviderAttempt, UserRole,
};
use letivo_quota::{
    QuotaLedger, QuotaStatus, calculate_cost_usd, current_month, get_pricing, to_brl, usage_entry,
};
use tracing::{info, warn};

use crate::dispatch::ProviderRouter;

/// One incoming chat request, identity already resolved by the gateway.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub user_id: String,
    pub role: UserRole,
    pub message: String,
    /// Caller-supplied module tag. Skips classification when present.
    pub module: Option<String>,
    /// Caller-supplied provider preference, promoted to the front of the
    /// routing chain for this request only.
    pub preferred_provider: Option<String>,
}

/// Everything the gateway needs to build the HTTP response.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: NormalizedResponse,
    pub classification: ClassificationResult,
    pub tier: ComplexityTier,
    pub attempts: Vec<ProviderAttempt>,
    /// Quota status as of the pre-check, before this request's usage.
    pub quota: QuotaStatus,
}

/// Wires the pipeline stages together.
pub struct Orchestrator {
    classifier: Arc<ModuleClassifier>,
    estimator: ComplexityEstimator,
    router: Arc<ProviderRouter>,
    ledger: Arc<QuotaLedger>,
    max_message_chars: usize,
    usd_to_brl_rate: f64,
}

impl Orchestrator {
    pub fn new(
        classifier: Arc<ModuleClassifier>,
        estimator: ComplexityEstimator,
        router: Arc<ProviderRouter>,
        ledger: Arc<QuotaLedger>,
        max_message_chars: usize,
        usd_to_brl_rate: f64,
    ) -> Self {
        Self {
            classifier,
            estimator,
            router,
            ledger,
            max_message_chars,
            usd_to_brl_rate,
        }
    }

    pub fn ledger(&self) -> &Arc<QuotaLedger> {
        &self.ledger
    }

    /// Run one chat request through the full pipeline.
    pub async fn handle(&self, request: ChatRequest) -> Result<ChatOutcome, LetivoError> {
        let message = request.message.trim();
        if message.is_empty() {
            return Err(LetivoError::Invalid("mensagem vazia".to_string()));
        }
        let length = message.chars().count();
        if length > self.max_message_chars {
            return Err(LetivoError::Invalid(format!(
                "mensagem com {length} caracteres excede o limite de {}",
                self.max_message_chars
            )));
        }

        let month = current_month();
        // Fail closed: a storage error here refuses the request before any
        // provider is contacted.
        let quota = self
            .ledger
            .check(&request.user_id, request.role, &month)
            .await?;
        if !quota.allowed {
            info!(user_id = %request.user_id, used = quota.used, limit = quota.limit, "quota refusal");
            return Err(LetivoError::QuotaExceeded {
                message: "Limite mensal de tokens atingido".to_string(),
            });
        }

        let classification = match &request.module {
            Some(module) if !module.trim().is_empty() => ClassificationResult {
                module: module.trim().to_lowercase(),
                confidence: 1.0,
                rationale: "caller",
                needs_images: false,
            },
            _ => self.classifier.classify(message).await,
        };

        let tier = self.estimator.estimate(message, Some(&classification.module));
        info!(
            user_id = %request.user_id,
            module = %classification.module,
            rationale = classification.rationale,
            tier = %tier,
            "request routed"
        );

        let prompt = vec![
            ChatMessage::system(system_prompt(&classification.module)),
            ChatMessage::user(message),
        ];
        let outcome = self
            .router
            .dispatch(
                &prompt,
                &classification.module,
                tier,
                request.preferred_provider.as_deref(),
            )
            .await?;

        self.commit_usage(&request.user_id, request.role, &month, &outcome.response);

        Ok(ChatOutcome {
            response: outcome.response,
            classification,
            tier,
            attempts: outcome.attempts,
            quota,
        })
    }

    /// Record usage off the request path. The response is already on its
    /// way back; a failed commit is logged, never surfaced.
    fn commit_usage(
        &self,
        user_id: &str,
        role: UserRole,
        month: &str,
        response: &NormalizedResponse,
    ) {
        let pricing = get_pricing(&response.model);
        let cost_usd = calculate_cost_usd(&response.usage, &pricing);
        let cost_brl = to_brl(cost_usd, self.usd_to_brl_rate);
        let entry = usage_entry(
            user_id,
            &response.provider,
            &response.model,
            &response.usage,
            cost_usd,
            cost_brl,
        );
        let ledger = Arc::clone(&self.ledger);
        let month = month.to_string();
        tokio::spawn(async move {
            if let Err(error) = ledger.commit(role, &entry, &month).await {
                warn!(error = %error, user_id = %entry.user_id, "usage commit failed");
            }
        });
    }
}

/// System prompt framing every dispatched conversation.
fn system_prompt(module: &str) -> String {
    format!(
        "Você é o assistente educacional do módulo {module} da plataforma Letivo. \
         Responda em português brasileiro, de forma clara e adequada ao contexto escolar."
    )
}
