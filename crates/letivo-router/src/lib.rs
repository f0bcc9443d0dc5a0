// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider routing and request orchestration.
//!
//! The plan picks candidates per complexity tier, the dispatch loop walks
//! them with timeout/retry/fallback, the normalizer folds every provider
//! reply into one envelope, and the orchestrator strings the whole
//! pipeline together behind a single `handle` call.

pub mod dispatch;
pub mod normalize;
pub mod orchestrator;
pub mod plan;
pub mod registry;

pub use dispatch::{DispatchOutcome, ProviderRouter};
pub use normalize::normalize;
pub use orchestrator::{ChatOutcome, ChatRequest, Orchestrator};
pub use plan::{RoutePlan, build_plan};
pub use registry::ProviderRegistry;
