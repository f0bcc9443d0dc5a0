// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by all pluggable adapters.

use async_trait::async_trait;

use crate::error::LetivoError;

/// What kind of adapter this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum AdapterType {
    /// AI text-generation backend.
    Provider,
    /// Persistence backend.
    Storage,
}

/// Liveness report from an adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

/// Common lifecycle surface for adapters.
///
/// Every provider and storage backend implements this so the binary can
/// report component health and shut the stack down in order.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Stable adapter identifier, e.g. `openai` or `gemini`.
    fn name(&self) -> &str;

    /// Adapter implementation version.
    fn version(&self) -> semver::Version;

    fn adapter_type(&self) -> AdapterType;

    /// Cheap liveness probe. Must not make a billable upstream call.
    async fn health_check(&self) -> Result<HealthStatus, LetivoError>;

    /// Flush and release resources. Called once at shutdown.
    async fn shutdown(&self) -> Result<(), LetivoError>;
}
