// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The single capability interface all AI providers are hidden behind.

use async_trait::async_trait;

use crate::error::LetivoError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderReply, ProviderRequest};

/// Text-generation capability.
///
/// The router and normalizer depend only on this trait, never on a
/// provider's wire shape. Each vendor crate implements it once as an
/// adapter over its HTTP client.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Generate a completion for the given request.
    ///
    /// Implementations must map upstream quota and rate-limit rejections
    /// into `LetivoError::Provider` messages that preserve the upstream
    /// wording, so the dispatch loop can recognize them.
    async fn generate(&self, request: &ProviderRequest) -> Result<ProviderReply, LetivoError>;
}
