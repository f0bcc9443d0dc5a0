// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response normalization.
//!
//! Every provider reply collapses into the same envelope so callers never
//! branch on which backend served a request. Missing usage is zero-filled
//! rather than optional: downstream quota accounting reads the fields
//! unconditionally.

use letivo_core::{NormalizedResponse, ProviderReply};
#[cfg(test)]
use letivo_core::TokenUsage;

/// Fold a provider reply into the uniform response envelope.
pub fn normalize(
    reply: ProviderReply,
    provider: &str,
    model: &str,
    latency_ms: u64,
) -> NormalizedResponse {
    NormalizedResponse {
        text: reply.text,
        usage: reply.usage.unwrap_or_default(),
        provider: provider.to_string(),
        model: model.to_string(),
        latency_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_passes_through_when_reported() {
        let reply = ProviderReply {
            text: "Brasília.".to_string(),
            usage: Some(TokenUsage::new(9, 3)),
        };
        let normalized = normalize(reply, "gemini", "gemini-2.0-flash", 240);
        assert_eq!(normalized.text, "Brasília.");
        assert_eq!(normalized.usage.total_tokens, 12);
        assert_eq!(normalized.provider, "gemini");
        assert_eq!(normalized.model, "gemini-2.0-flash");
        assert_eq!(normalized.latency_ms, 240);
    }

    #[test]
    fn missing_usage_is_zero_filled() {
        let reply = ProviderReply {
            text: "ok".to_string(),
            usage: None,
        };
        let normalized = normalize(reply, "grok", "grok-4-fast", 100);
        assert_eq!(normalized.usage.prompt_tokens, 0);
        assert_eq!(normalized.usage.completion_tokens, 0);
        assert_eq!(normalized.usage.total_tokens, 0);
    }
}
