// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model pricing tables and cost calculation.
//!
//! Prices in USD per million tokens, matched on model-name substrings.
//! Unknown models fall back to a conservative (expensive) rate so cost
//! tracking never silently undercounts.

use letivo_core::TokenUsage;

/// Per-model pricing in USD per million tokens.
#[derive(Debug, Clone)]
pub struct ModelPricing {
    /// Cost per million prompt tokens.
    pub input_per_mtok: f64,
    /// Cost per million completion tokens.
    pub output_per_mtok: f64,
}

/// Look up pricing for a model identifier.
///
/// Substring match, most specific first: `gpt-4o-mini` must win over
/// `gpt-4o`.
pub fn get_pricing(model: &str) -> ModelPricing {
    let lower = model.to_lowercase();

    if lower.contains("gpt-4o-mini") {
        ModelPricing {
            input_per_mtok: 0.15,
            output_per_mtok: 0.60,
        }
    } else if lower.contains("gpt-4o") {
        ModelPricing {
            input_per_mtok: 2.50,
            output_per_mtok: 10.0,
        }
    } else if lower.contains("gemini") && lower.contains("pro") {
        ModelPricing {
            input_per_mtok: 1.25,
            output_per_mtok: 10.0,
        }
    } else if lower.contains("gemini") {
        ModelPricing {
            input_per_mtok: 0.10,
            output_per_mtok: 0.40,
        }
    } else if lower.contains("grok") && lower.contains("fast") {
        ModelPricing {
            input_per_mtok: 0.20,
            output_per_mtok: 0.50,
        }
    } else if lower.contains("grok") {
        ModelPricing {
            input_per_mtok: 3.0,
            output_per_mtok: 15.0,
        }
    } else if lower.contains("sonar-pro") {
        ModelPricing {
            input_per_mtok: 3.0,
            output_per_mtok: 15.0,
        }
    } else if lower.contains("sonar") {
        ModelPricing {
            input_per_mtok: 1.0,
            output_per_mtok: 1.0,
        }
    } else {
        // Conservative fallback for unknown models.
        ModelPricing {
            input_per_mtok: 3.0,
            output_per_mtok: 15.0,
        }
    }
}

/// Cost in USD for a token usage at the given pricing.
pub fn calculate_cost_usd(usage: &TokenUsage, pricing: &ModelPricing) -> f64 {
    let input = (usage.prompt_tokens as f64 / 1_000_000.0) * pricing.input_per_mtok;
    let output = (usage.completion_tokens as f64 / 1_000_000.0) * pricing.output_per_mtok;
    input + output
}

/// Convert a USD cost to BRL at the configured exchange rate.
pub fn to_brl(cost_usd: f64, usd_to_brl_rate: f64) -> f64 {
    cost_usd * usd_to_brl_rate
}
