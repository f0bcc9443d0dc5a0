// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared domain types used across Letivo crates.

use serde::{Deserialize, Serialize};

/// Role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One turn of a conversation, the prompt unit handed to providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Subscription role of the requesting user, supplied by the identity layer.
///
/// Determines the default monthly token limit when a quota row is created
/// lazily for a new (user, month) pair.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum UserRole {
    Free,
    Premium,
    Admin,
}

/// Token counts for one provider call. Always fully populated: adapters
/// zero-fill when the upstream response omits usage, so quota accounting
/// never sees a missing field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

impl TokenUsage {
    pub fn new(prompt_tokens: u64, completion_tokens: u64) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// A generation request as seen by a provider adapter.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Model identifier in the provider's own namespace.
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// What a provider adapter hands back: text plus whatever usage the
/// upstream reported. `usage` stays `None` when the provider omitted it;
/// the normalizer zero-fills.
#[derive(Debug, Clone)]
pub struct ProviderReply {
    pub text: String,
    pub usage: Option<TokenUsage>,
}

/// The uniform response envelope every dispatch produces, regardless of
/// which backend served it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedResponse {
    pub text: String,
    pub usage: TokenUsage,
    pub provider: String,
    pub model: String,
    pub latency_ms: u64,
}

/// Result of classifying a message into a subject module.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    /// Module tag, e.g. `professor`, `ti`, `financeiro`.
    pub module: String,
    /// Confidence in `[0.0, 1.0]`.
    pub confidence: f32,
    /// How the result was produced: `pattern`, `inference`, or `fallback`.
    pub rationale: &'static str,
    /// Whether the message phrasing suggests the answer benefits from images.
    pub needs_images: bool,
}

impl ClassificationResult {
    /// The recovery value used whenever classification cannot complete.
    /// Never an error: a chat message always routes somewhere.
    pub fn fallback() -> Self {
        Self {
            module: "atendimento".to_string(),
            confidence: 0.0,
            rationale: "fallback",
            needs_images: false,
        }
    }
}

/// Complexity tier driving provider/model selection.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ComplexityTier {
    Trivial,
    Simple,
    Complex,
}

/// Outcome of a single dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttemptOutcome {
    Success,
    Error,
    Timeout,
}

/// Record of one provider call attempt. Ephemeral: logged and returned to
/// the caller for inspection, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderAttempt {
    pub provider: String,
    pub model: String,
    pub outcome: AttemptOutcome,
    pub latency_ms: u64,
}
