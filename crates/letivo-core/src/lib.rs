// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core types, error taxonomy, and adapter traits for the Letivo
//! message-orchestration router.
//!
//! Everything here is dependency-light on purpose: the concrete provider,
//! storage, and HTTP crates all depend on `letivo-core`, never the other
//! way around.

pub mod error;
pub mod traits;
pub mod types;

pub use error::LetivoError;
pub use traits::{AdapterType, HealthStatus, PluginAdapter, ProviderAdapter};
pub use types::{
    AttemptOutcome, ChatMessage, ChatRole, ClassificationResult, ComplexityTier,
    NormalizedResponse, ProviderAttempt, ProviderReply, ProviderRequest, TokenUsage, UserRole,
};
