// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry of live provider adapters, keyed by adapter name.

use std::collections::HashMap;
use std::sync::Arc;

use letivo_core::ProviderAdapter;
use tracing::{info, warn};

/// Providers available for dispatch.
///
/// Populated once at startup from the configured credentials; a provider
/// with no usable API key is simply never registered, and routing chains
/// skip candidates that resolve to no registered provider.
#[derive(Default, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider under its adapter name.
    pub fn register(&mut self, provider: Arc<dyn ProviderAdapter>) {
        info!(provider = %provider.name(), "provider registered");
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.providers.get(name).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Registered provider names, sorted for stable log output.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Registered adapters, sorted by name for stable iteration order.
    pub fn adapters(&self) -> Vec<Arc<dyn ProviderAdapter>> {
        let mut adapters: Vec<_> = self.providers.values().cloned().collect();
        adapters.sort_by(|a, b| a.name().cmp(b.name()));
        adapters
    }

    /// Shut every provider down in order. Failures are logged, not
    /// propagated: shutdown must visit every adapter.
    pub async fn shutdown_all(&self) {
        for adapter in self.adapters() {
            if let Err(e) = adapter.shutdown().await {
                warn!(provider = %adapter.name(), error = %e, "provider shutdown failed");
            }
        }
    }
}
