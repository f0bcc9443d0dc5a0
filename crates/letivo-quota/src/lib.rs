// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monthly token quota accounting and model pricing.
//!
//! The ledger is pure bookkeeping: it never calls a provider. The
//! orchestrator checks quota before dispatch (fail-closed) and commits
//! usage after the response is produced (best-effort).

pub mod ledger;
pub mod pricing;

pub use ledger::{QuotaLedger, QuotaStatus, current_month, usage_entry};
pub use pricing::{ModelPricing, calculate_cost_usd, get_pricing, to_brl};
