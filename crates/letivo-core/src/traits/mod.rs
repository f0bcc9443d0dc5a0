// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter traits implemented at the seams of the system.

pub mod adapter;
pub mod provider;

pub use adapter::{AdapterType, HealthStatus, PluginAdapter};
pub use provider::ProviderAdapter;
