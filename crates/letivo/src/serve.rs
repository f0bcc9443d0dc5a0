// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `letivo serve` command implementation.
//!
//! Wires the full pipeline: SQLite storage, the quota ledger, the module
//! classifier, the complexity estimator, the provider router, and the HTTP
//! gateway. Providers are registered from configured credentials; a
//! provider with no usable API key is logged and left out, and routing
//! chains skip it at dispatch time.

use std::sync::Arc;

use letivo_classifier::{ComplexityEstimator, ModuleClassifier};
use letivo_config::model::LetivoConfig;
use letivo_core::LetivoError;
use letivo_gateway::{AuthConfig, GatewayState, start_server};
use letivo_gemini::GeminiProvider;
use letivo_grok::GrokProvider;
use letivo_openai::OpenAiProvider;
use letivo_perplexity::PerplexityProvider;
use letivo_quota::QuotaLedger;
use letivo_router::{Orchestrator, ProviderRegistry, ProviderRouter};
use tracing::{info, warn};

/// Build the provider registry from configured credentials.
fn build_registry(config: &LetivoConfig) -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();

    match OpenAiProvider::new(&config.openai) {
        Ok(provider) => registry.register(Arc::new(provider)),
        Err(e) => warn!(provider = "openai", error = %e, "provider not registered"),
    }
    match GeminiProvider::new(&config.gemini) {
        Ok(provider) => registry.register(Arc::new(provider)),
        Err(e) => warn!(provider = "gemini", error = %e, "provider not registered"),
    }
    match GrokProvider::new(&config.grok) {
        Ok(provider) => registry.register(Arc::new(provider)),
        Err(e) => warn!(provider = "grok", error = %e, "provider not registered"),
    }
    match PerplexityProvider::new(&config.perplexity) {
        Ok(provider) => registry.register(Arc::new(provider)),
        Err(e) => warn!(provider = "perplexity", error = %e, "provider not registered"),
    }

    registry
}

/// Run the `letivo serve` command.
pub async fn run_serve(config: LetivoConfig) -> Result<(), LetivoError> {
    init_tracing(&config.service.log_level);

    info!(service = %config.service.name, "starting letivo serve");

    let conn = letivo_storage::open_database(&config.storage).await?;
    let ledger = Arc::new(QuotaLedger::new(conn, config.quota.clone()));

    let registry = build_registry(&config);
    if registry.is_empty() {
        return Err(LetivoError::Config(
            "no provider credentials configured; set at least one API key".to_string(),
        ));
    }
    info!(providers = ?registry.names(), "provider registry ready");

    let mut classifier = ModuleClassifier::new(config.classifier.clone())?;
    if let Some(refine_provider) = &config.classifier.refine_provider {
        match registry.get(refine_provider) {
            Some(refiner) => classifier = classifier.with_refiner(refiner),
            None => warn!(
                provider = %refine_provider,
                "refine provider not registered; classification will not use inference"
            ),
        }
    }
    let classifier = Arc::new(classifier);

    let estimator = ComplexityEstimator::new(config.complexity.clone());
    let router = Arc::new(ProviderRouter::new(
        registry.clone(),
        config.routing.clone(),
    ));
    let orchestrator = Arc::new(Orchestrator::new(
        classifier,
        estimator,
        router,
        ledger.clone(),
        config.service.max_message_chars,
        config.quota.usd_to_brl_rate,
    ));

    let state = GatewayState {
        orchestrator,
        ledger,
        registry,
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
        start_time: std::time::Instant::now(),
    };

    start_server(&config.gateway, state).await
}

/// Initialize the tracing subscriber from the configured log level.
///
/// `RUST_LOG` wins when set, so operators can override per-target levels
/// without touching the config file.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{log_level},hyper=warn,reqwest=warn,tower_http=warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
