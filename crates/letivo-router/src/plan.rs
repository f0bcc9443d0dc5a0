// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routing plan construction.
//!
//! A plan is the ordered candidate list plus generation parameters for one
//! dispatch. It is computed fresh per request from configuration, so a
//! caller's preferred provider only reorders that one request's chain.

use letivo_config::model::{RouteTarget, RoutingConfig, TierParams};
use letivo_core::ComplexityTier;

/// Ordered candidates and generation parameters for one dispatch.
#[derive(Debug, Clone)]
pub struct RoutePlan {
    pub tier: ComplexityTier,
    pub candidates: Vec<RouteTarget>,
    pub params: TierParams,
}

/// Build the plan for a tier.
///
/// When `preferred_provider` is given, that provider's candidates move to
/// the front of the chain, keeping their relative order; the rest of the
/// chain follows unchanged so fallback still works when the preferred
/// provider fails. A preferred provider not present in the tier's chain
/// changes nothing.
pub fn build_plan(
    config: &RoutingConfig,
    tier: ComplexityTier,
    preferred_provider: Option<&str>,
) -> RoutePlan {
    let (chain, params) = match tier {
        ComplexityTier::Trivial => (&config.trivial, &config.trivial_params),
        ComplexityTier::Simple => (&config.simple, &config.simple_params),
        ComplexityTier::Complex => (&config.complex, &config.complex_params),
    };

    let candidates = match preferred_provider {
        Some(preferred) => {
            let (front, back): (Vec<RouteTarget>, Vec<RouteTarget>) = chain
                .iter()
                .cloned()
                .partition(|target| target.provider == preferred);
            front.into_iter().chain(back).collect()
        }
        None => chain.clone(),
    };

    RoutePlan {
        tier,
        candidates,
        params: params.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_selects_its_chain_and_params() {
        let config = RoutingConfig::default();

        let trivial = build_plan(&config, ComplexityTier::Trivial, None);
        assert_eq!(trivial.candidates, config.trivial);
        assert_eq!(trivial.params.max_tokens, config.trivial_params.max_tokens);

        let complex = build_plan(&config, ComplexityTier::Complex, None);
        assert_eq!(complex.candidates, config.complex);
        assert_eq!(complex.params.max_tokens, config.complex_params.max_tokens);
    }

    #[test]
    fn preferred_provider_moves_to_front() {
        let config = RoutingConfig::default();
        // Default trivial chain: gemini, openai, grok.
        let plan = build_plan(&config, ComplexityTier::Trivial, Some("grok"));
        assert_eq!(plan.candidates[0].provider, "grok");
        assert_eq!(plan.candidates[1].provider, "gemini");
        assert_eq!(plan.candidates[2].provider, "openai");
        assert_eq!(plan.candidates.len(), config.trivial.len());
    }

    #[test]
    fn unknown_preferred_provider_changes_nothing() {
        let config = RoutingConfig::default();
        let plan = build_plan(&config, ComplexityTier::Simple, Some("anthropic"));
        assert_eq!(plan.candidates, config.simple);
    }

    #[test]
    fn preferred_keeps_relative_order_of_its_candidates() {
        let mut config = RoutingConfig::default();
        config.complex = vec![
            RouteTarget::new("openai", "gpt-4o"),
            RouteTarget::new("gemini", "gemini-2.5-pro"),
            RouteTarget::new("openai", "gpt-4o-mini"),
        ];
        let plan = build_plan(&config, ComplexityTier::Complex, Some("openai"));
        assert_eq!(plan.candidates[0].model, "gpt-4o");
        assert_eq!(plan.candidates[1].model, "gpt-4o-mini");
        assert_eq!(plan.candidates[2].provider, "gemini");
    }
}
