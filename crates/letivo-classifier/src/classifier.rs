// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Module classification with a bounded cache and in-flight de-duplication.
//!
//! Classification is two-stage: a fast local pattern pass over per-module
//! keyword tables, then an optional provider-backed refinement when the
//! pattern pass is below the configured confidence threshold. The common
//! path makes no network call.
//!
//! `classify` never errors: any failure degrades to the `atendimento`
//! fallback with confidence 0.0.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use letivo_config::model::ClassifierConfig;
use letivo_core::{ChatMessage, ClassificationResult, ProviderAdapter, ProviderRequest};
use regex::RegexSet;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::patterns::{FALLBACK_MODULE, MODULE_PATTERNS, VISUAL_INTENT_PATTERNS};

/// Confidence assigned per pattern hit, on top of the single-hit base.
const PATTERN_HIT_STEP: f32 = 0.15;
const PATTERN_BASE_CONFIDENCE: f32 = 0.45;
const PATTERN_MAX_CONFIDENCE: f32 = 0.95;
const INFERENCE_CONFIDENCE: f32 = 0.9;

struct CacheEntry {
    result: ClassificationResult,
    inserted_at: Instant,
}

/// One compiled module pattern set.
struct ModuleMatcher {
    module: &'static str,
    set: RegexSet,
}

/// Classifies free text into a subject module.
///
/// Safe to share across requests: the cache is concurrent, and identical
/// normalized inputs arriving while a classification is in flight share a
/// single pending computation.
pub struct ModuleClassifier {
    config: ClassifierConfig,
    matchers: Vec<ModuleMatcher>,
    visual: RegexSet,
    cache: DashMap<String, CacheEntry>,
    pending: DashMap<String, Arc<OnceCell<ClassificationResult>>>,
    refiner: Option<Arc<dyn ProviderAdapter>>,
}

impl ModuleClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, letivo_core::LetivoError> {
        let mut matchers = Vec::with_capacity(MODULE_PATTERNS.len());
        for (module, patterns) in MODULE_PATTERNS {
            let set = RegexSet::new(patterns.iter().map(|p| format!("(?i){p}")))
                .map_err(|e| letivo_core::LetivoError::Internal(e.to_string()))?;
            matchers.push(ModuleMatcher { module, set });
        }
        let visual = RegexSet::new(VISUAL_INTENT_PATTERNS.iter().map(|p| format!("(?i){p}")))
            .map_err(|e| letivo_core::LetivoError::Internal(e.to_string()))?;

        Ok(Self {
            config,
            matchers,
            visual,
            cache: DashMap::new(),
            pending: DashMap::new(),
            refiner: None,
        })
    }

    /// Attach a provider used for refinement when the pattern pass is below
    /// the confidence threshold.
    pub fn with_refiner(mut self, refiner: Arc<dyn ProviderAdapter>) -> Self {
        self.refiner = Some(refiner);
        self
    }

    /// Classify a message. Infallible: failures degrade to the fallback.
    pub async fn classify(&self, text: &str) -> ClassificationResult {
        let key = normalize(text);
        if key.is_empty() {
            return ClassificationResult::fallback();
        }

        if let Some(hit) = self.cache_get(&key) {
            debug!(module = %hit.module, "classification cache hit");
            return hit;
        }

        // In-flight de-duplication: the first caller for a key runs the
        // classification; everyone else awaits the same cell.
        let cell = self
            .pending
            .entry(key.clone())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell
            .get_or_init(|| self.classify_uncached(key.clone()))
            .await
            .clone();

        self.pending.remove(&key);
        // A degraded fallback would pin the message to `atendimento` for the
        // whole TTL; leave it uncached so a recovered refiner gets retried.
        if result.rationale != "fallback" {
            self.cache_put(key, result.clone());
        }
        result
    }

    async fn classify_uncached(&self, key: String) -> ClassificationResult {
        let needs_images = self.visual.is_match(&key);
        let pattern_result = self.pattern_pass(&key, needs_images);

        let below_threshold = pattern_result.confidence < self.config.confidence_threshold;
        if below_threshold && self.refiner.is_some() {
            match self.refine(&key).await {
                Ok(module) => {
                    debug!(module = %module, "classification refined by inference");
                    return ClassificationResult {
                        module,
                        confidence: INFERENCE_CONFIDENCE,
                        rationale: "inference",
                        needs_images,
                    };
                }
                Err(e) => {
                    warn!(error = %e, "classification inference failed, using fallback");
                    return ClassificationResult::fallback();
                }
            }
        }

        pattern_result
    }

    /// Local keyword pass. Best-matching module wins; no match at all maps
    /// to the fallback module with low confidence.
    fn pattern_pass(&self, key: &str, needs_images: bool) -> ClassificationResult {
        let mut best: Option<(&'static str, usize)> = None;
        for matcher in &self.matchers {
            let hits = matcher.set.matches(key).iter().count();
            if hits > 0 && best.map_or(true, |(_, b)| hits > b) {
                best = Some((matcher.module, hits));
            }
        }

        match best {
            Some((module, hits)) => {
                let confidence = (PATTERN_BASE_CONFIDENCE + PATTERN_HIT_STEP * hits as f32)
                    .min(PATTERN_MAX_CONFIDENCE);
                ClassificationResult {
                    module: module.to_string(),
                    confidence,
                    rationale: "pattern",
                    needs_images,
                }
            }
            None => ClassificationResult {
                module: FALLBACK_MODULE.to_string(),
                confidence: 0.3,
                rationale: "pattern",
                needs_images,
            },
        }
    }

    /// Ask the configured refinement model to pick a module. The reply is
    /// matched against the known module list; anything else is an error so
    /// the caller falls back.
    async fn refine(&self, key: &str) -> Result<String, letivo_core::LetivoError> {
        let refiner = self
            .refiner
            .as_ref()
            .ok_or_else(|| letivo_core::LetivoError::Internal("no refiner configured".into()))?;

        let modules: Vec<&str> = MODULE_PATTERNS
            .iter()
            .map(|(m, _)| *m)
            .chain(std::iter::once(FALLBACK_MODULE))
            .collect();
        let system = format!(
            "Classifique a mensagem do usuário em exatamente um destes módulos: {}. \
             Responda apenas com o nome do módulo.",
            modules.join(", ")
        );

        let request = ProviderRequest {
            model: self.config.refine_model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(key)],
            temperature: 0.0,
            max_tokens: 16,
        };

        let reply = refiner.generate(&request).await?;
        let answer = reply.text.trim().to_lowercase();
        modules
            .iter()
            .find(|m| answer.contains(*m))
            .map(|m| m.to_string())
            .ok_or_else(|| {
                letivo_core::LetivoError::provider(format!(
                    "unrecognized classification reply: {answer}"
                ))
            })
    }

    fn cache_get(&self, key: &str) -> Option<ClassificationResult> {
        let ttl = Duration::from_secs(self.config.cache_ttl_secs);
        let entry = self.cache.get(key)?;
        if entry.inserted_at.elapsed() > ttl {
            drop(entry);
            self.cache.remove(key);
            return None;
        }
        Some(entry.result.clone())
    }

    fn cache_put(&self, key: String, result: ClassificationResult) {
        // Evict the oldest entry once the cap is reached. Linear scan is
        // fine at the configured cap sizes.
        if self.cache.len() >= self.config.cache_max_entries {
            let oldest = self
                .cache
                .iter()
                .min_by_key(|e| e.value().inserted_at)
                .map(|e| e.key().clone());
            if let Some(oldest_key) = oldest {
                self.cache.remove(&oldest_key);
            }
        }
        self.cache.insert(
            key,
            CacheEntry {
                result,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Number of cached classifications. Exposed for tests and status
    /// reporting.
    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }
}

/// Cache key normalization: trim and lowercase.
fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, Ordering};

    use async_trait::async_trait;
    use letivo_core::{
        AdapterType, HealthStatus, LetivoError, PluginAdapter, ProviderReply,
    };

    use super::*;

    /// Counting provider used to assert how many inference calls happen.
    struct CountingRefiner {
        calls: AtomicU64,
        reply: String,
        fail: bool,
        delay: Duration,
    }

    impl CountingRefiner {
        fn new(reply: &str) -> Self {
            Self {
                calls: AtomicU64::new(0),
                reply: reply.to_string(),
                fail: false,
                delay: Duration::from_millis(0),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new("")
            }
        }

        fn slow(reply: &str, delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(reply)
            }
        }
    }

    #[async_trait]
    impl PluginAdapter for CountingRefiner {
        fn name(&self) -> &str {
            "counting-refiner"
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
    impl ProviderAdapter for CountingRefiner {
        async fn generate(
            &self,
            _request: &ProviderRequest,
        ) -> Result<ProviderReply, LetivoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(LetivoError::provider("inference unavailable"));
            }
            Ok(ProviderReply {
                text: self.reply.clone(),
                usage: None,
            })
        }
    }

    fn classifier() -> ModuleClassifier {
        ModuleClassifier::new(ClassifierConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn enem_message_classified_by_pattern() {
        let c = classifier();
        let result = c.classify("Me ajude com o simulado do ENEM").await;
        assert_eq!(result.module, "enem");
        assert_eq!(result.rationale, "pattern");
        assert!(result.confidence > 0.0);
    }

    #[tokio::test]
    async fn ti_message_classified_by_pattern() {
        let c = classifier();
        let result = c.classify("A impressora da sala não funciona").await;
        assert_eq!(result.module, "ti");
    }

    #[tokio::test]
    async fn unmatched_text_falls_back_to_atendimento() {
        let c = classifier();
        let result = c.classify("xyzzy plugh abracadabra").await;
        assert_eq!(result.module, "atendimento");
    }

    #[tokio::test]
    async fn empty_input_is_fallback() {
        let c = classifier();
        let result = c.classify("   ").await;
        assert_eq!(result.module, "atendimento");
        assert_eq!(result.confidence, 0.0);
    }

    #[tokio::test]
    async fn classification_is_cached_and_idempotent() {
        let refiner = Arc::new(CountingRefiner::new("professor"));
        let c = ModuleClassifier::new(ClassifierConfig::default())
            .unwrap()
            .with_refiner(refiner.clone());

        // Gibberish matches no pattern, so this goes through inference.
        let first = c.classify("blorp fnord zzz").await;
        let second = c.classify("blorp fnord zzz").await;

        assert_eq!(first, second);
        assert_eq!(refiner.calls.load(Ordering::SeqCst), 1, "second call must be served from cache");
    }

    #[tokio::test]
    async fn normalization_shares_cache_entries() {
        let refiner = Arc::new(CountingRefiner::new("professor"));
        let c = ModuleClassifier::new(ClassifierConfig::default())
            .unwrap()
            .with_refiner(refiner.clone());

        c.classify("  Blorp Fnord ZZZ  ").await;
        c.classify("blorp fnord zzz").await;
        assert_eq!(refiner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_identical_calls_deduplicate_to_one_inference() {
        let refiner = Arc::new(CountingRefiner::slow(
            "financeiro",
            Duration::from_millis(50),
        ));
        let c = Arc::new(
            ModuleClassifier::new(ClassifierConfig::default())
                .unwrap()
                .with_refiner(refiner.clone()),
        );

        let mut handles = Vec::new();
        for _ in 0..10 {
            let c = Arc::clone(&c);
            handles.push(tokio::spawn(
                async move { c.classify("qqq www eee").await },
            ));
        }
        let results = futures::future::join_all(handles).await;

        for result in results {
            assert_eq!(result.unwrap().module, "financeiro");
        }
        assert_eq!(
            refiner.calls.load(Ordering::SeqCst),
            1,
            "concurrent identical keys must share one inference call"
        );
    }

    #[tokio::test]
    async fn inference_failure_degrades_to_fallback() {
        let refiner = Arc::new(CountingRefiner::failing());
        let c = ModuleClassifier::new(ClassifierConfig::default())
            .unwrap()
            .with_refiner(refiner);

        let result = c.classify("wibble wobble").await;
        assert_eq!(result.module, "atendimento");
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.rationale, "fallback");
    }

    #[tokio::test]
    async fn inference_failure_is_not_cached() {
        let refiner = Arc::new(CountingRefiner::failing());
        let c = ModuleClassifier::new(ClassifierConfig::default())
            .unwrap()
            .with_refiner(refiner.clone());

        c.classify("wibble wobble").await;
        let second = c.classify("wibble wobble").await;

        assert_eq!(second.rationale, "fallback");
        assert_eq!(c.cache_len(), 0);
        assert_eq!(
            refiner.calls.load(Ordering::SeqCst),
            2,
            "a failed inference must be retried on the next call"
        );
    }

    #[tokio::test]
    async fn cache_is_bounded() {
        let mut config = ClassifierConfig::default();
        config.cache_max_entries = 2;
        let c = ModuleClassifier::new(config).unwrap();

        c.classify("primeira mensagem sem padrão aa").await;
        c.classify("segunda mensagem sem padrão bb").await;
        c.classify("terceira mensagem sem padrão cc").await;

        assert!(c.cache_len() <= 2);
    }

    #[tokio::test]
    async fn visual_intent_sets_needs_images() {
        let c = classifier();
        let result = c
            .classify("Como funciona a estrutura de uma célula?")
            .await;
        assert!(result.needs_images);
    }

    #[tokio::test]
    async fn plain_question_does_not_need_images() {
        let c = classifier();
        let result = c.classify("Qual a capital do Brasil?").await;
        assert!(!result.needs_images);
    }
}
