// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Heuristic complexity estimation for routing tier selection.
//!
//! Pure function over text features: no I/O, no state, same tier for the
//! same (message, module hint) on every call. Thresholds and keyword lists
//! come from configuration so routing can be tuned without a rebuild.

use letivo_config::model::ComplexityConfig;
use letivo_core::ComplexityTier;

/// Scores a message into a [`ComplexityTier`].
#[derive(Debug, Clone)]
pub struct ComplexityEstimator {
    config: ComplexityConfig,
}

impl ComplexityEstimator {
    pub fn new(config: ComplexityConfig) -> Self {
        Self { config }
    }

    /// Estimate the complexity tier for a message.
    ///
    /// Callers validate input upstream; empty text never reaches here in
    /// the request path, but the estimator still answers deterministically
    /// for it (trivial).
    pub fn estimate(&self, text: &str, module_hint: Option<&str>) -> ComplexityTier {
        let normalized = text.trim().to_lowercase();
        let mut score: i32 = 0;

        // Length signal.
        let len = normalized.chars().count();
        if len >= self.config.complex_min_chars {
            score += 2;
        } else if len <= self.config.trivial_max_chars {
            score -= 2;
        }

        // Analytical keyword signal.
        let keyword_hits = self
            .config
            .complex_keywords
            .iter()
            .filter(|k| normalized.contains(k.as_str()))
            .count();
        if keyword_hits >= 2 {
            score += 3;
        } else if keyword_hits == 1 {
            score += 2;
        }

        // Multi-part question signal.
        let questions = normalized.matches('?').count();
        if questions >= self.config.multi_question_min {
            score += 1;
        }

        // Module bias: essay grading and exam prep lean heavy, general
        // support leans light.
        if let Some(module) = module_hint {
            if self.config.heavier_modules.iter().any(|m| m == module) {
                score += 2;
            } else if self.config.lighter_modules.iter().any(|m| m == module) {
                score -= 1;
            }
        }

        Self::score_to_tier(score)
    }

    fn score_to_tier(score: i32) -> ComplexityTier {
        if score >= 3 {
            ComplexityTier::Complex
        } else if score <= -1 {
            ComplexityTier::Trivial
        } else {
            ComplexityTier::Simple
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> ComplexityEstimator {
        ComplexityEstimator::new(ComplexityConfig::default())
    }

    #[test]
    fn short_factual_question_is_trivial() {
        let tier = estimator().estimate("Qual a capital do Brasil?", Some("professor"));
        assert_eq!(tier, ComplexityTier::Trivial);
    }

    #[test]
    fn medium_message_is_simple() {
        let text = "Pode me ajudar a entender a diferença entre mitose e meiose \
                    para a prova da semana que vem?";
        let tier = estimator().estimate(text, Some("professor"));
        assert_eq!(tier, ComplexityTier::Simple);
    }

    #[test]
    fn analytical_keywords_push_complex() {
        let text = "Faça uma análise detalhada e compare as causas da Primeira e da \
                    Segunda Guerra Mundial, com exemplos de cada período histórico.";
        let tier = estimator().estimate(text, None);
        assert_eq!(tier, ComplexityTier::Complex);
    }

    #[test]
    fn heavy_module_biases_upward() {
        let text = "Pode corrigir e avalie minha produção textual sobre desigualdade \
                    social no Brasil contemporâneo, por favor.";
        let neutral = estimator().estimate(text, None);
        let biased = estimator().estimate(text, Some("redacao"));
        assert_eq!(neutral, ComplexityTier::Simple);
        assert_eq!(biased, ComplexityTier::Complex);
    }

    #[test]
    fn lighter_module_biases_downward() {
        let text = "Oi, tudo bem? Preciso falar com alguém da escola.";
        let tier = estimator().estimate(text, Some("atendimento"));
        assert_eq!(tier, ComplexityTier::Trivial);
    }

    #[test]
    fn deterministic_for_identical_input() {
        let est = estimator();
        let text = "Explique passo a passo como resolver uma equação de segundo grau?";
        let first = est.estimate(text, Some("professor"));
        for _ in 0..10 {
            assert_eq!(est.estimate(text, Some("professor")), first);
        }
    }

    #[test]
    fn long_message_is_complex() {
        let text = "a".repeat(200) + " desenvolva e justifique";
        let tier = estimator().estimate(&text, None);
        assert_eq!(tier, ComplexityTier::Complex);
    }

    #[test]
    fn custom_thresholds_are_honored() {
        let mut config = ComplexityConfig::default();
        config.trivial_max_chars = 5;
        config.complex_min_chars = 10;
        let est = ComplexityEstimator::new(config);
        assert_eq!(est.estimate("oi", None), ComplexityTier::Trivial);
        assert_eq!(
            est.estimate("uma mensagem maior que dez", None),
            ComplexityTier::Simple
        );
    }
}
