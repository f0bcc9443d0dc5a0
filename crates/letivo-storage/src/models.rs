// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row models for the quota tables.

use serde::{Deserialize, Serialize};

/// One (user, month) quota row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRecord {
    pub user_id: String,
    /// Month key in `YYYY-MM` form.
    pub month: String,
    pub token_limit: u64,
    pub token_used: u64,
    pub is_active: bool,
}

/// One append-only usage audit row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageLogEntry {
    /// Unique row identifier (UUID v4).
    pub id: String,
    pub user_id: String,
    pub provider: String,
    pub model: String,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub cost_usd: f64,
    pub cost_brl: f64,
    /// ISO 8601 timestamp.
    pub created_at: String,
}
