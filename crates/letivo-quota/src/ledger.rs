// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monthly token quota ledger backed by SQLite.
//!
//! One `quota_records` row per (user, month), created lazily with the
//! role's default limit. Usage commits are a single in-database increment
//! plus an append to `usage_log`, executed in one transaction, so
//! concurrent commits for the same user never lose updates.

use letivo_config::model::QuotaConfig;
use letivo_core::{LetivoError, TokenUsage, UserRole};
use letivo_storage::models::{QuotaRecord, UsageLogEntry};
use serde::Serialize;
use tracing::info;

/// Result of a quota pre-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuotaStatus {
    /// Whether a new request may be dispatched.
    pub allowed: bool,
    /// Tokens left this month (zero when over the limit).
    pub remaining: u64,
    pub limit: u64,
    pub used: u64,
}

impl From<&QuotaRecord> for QuotaStatus {
    fn from(record: &QuotaRecord) -> Self {
        Self {
            allowed: record.is_active && record.token_used < record.token_limit,
            remaining: record.token_limit.saturating_sub(record.token_used),
            limit: record.token_limit,
            used: record.token_used,
        }
    }
}

/// Month key in `YYYY-MM` form for the current UTC month.
pub fn current_month() -> String {
    chrono::Utc::now().format("%Y-%m").to_string()
}

/// Convert a tokio-rusqlite error into LetivoError::Storage.
fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LetivoError {
    LetivoError::Storage {
        source: Box::new(e),
    }
}

/// Persistent per-user monthly token ledger.
///
/// All operations go through the single tokio-rusqlite background thread.
pub struct QuotaLedger {
    conn: tokio_rusqlite::Connection,
    config: QuotaConfig,
}

impl QuotaLedger {
    pub fn new(conn: tokio_rusqlite::Connection, config: QuotaConfig) -> Self {
        Self { conn, config }
    }

    /// Default monthly limit for a role, from configuration.
    pub fn default_limit(&self, role: UserRole) -> u64 {
        match role {
            UserRole::Free => self.config.free_monthly_tokens,
            UserRole::Premium => self.config.premium_monthly_tokens,
            UserRole::Admin => self.config.admin_monthly_tokens,
        }
    }

    /// Read the month's quota status, creating a zero-usage row with the
    /// role's default limit if this is the user's first request this month.
    ///
    /// Callers must treat a storage error as not-allowed (fail closed).
    pub async fn check(
        &self,
        user_id: &str,
        role: UserRole,
        month: &str,
    ) -> Result<QuotaStatus, LetivoError> {
        let user_id = user_id.to_string();
        let month = month.to_string();
        let default_limit = self.default_limit(role);

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT OR IGNORE INTO quota_records (user_id, month, token_limit) \
                     VALUES (?1, ?2, ?3)",
                    rusqlite::params![user_id, month, default_limit],
                )?;
                let record = conn.query_row(
                    "SELECT user_id, month, token_limit, token_used, is_active \
                     FROM quota_records WHERE user_id = ?1 AND month = ?2",
                    rusqlite::params![user_id, month],
                    |row| {
                        Ok(QuotaRecord {
                            user_id: row.get(0)?,
                            month: row.get(1)?,
                            token_limit: row.get(2)?,
                            token_used: row.get(3)?,
                            is_active: row.get(4)?,
                        })
                    },
                )?;
                Ok(QuotaStatus::from(&record))
            })
            .await
            .map_err(map_tr_err)
    }

    /// Commit usage for a completed request: increment the month's counter
    /// and append the audit row, atomically.
    ///
    /// The increment happens inside SQLite (`token_used = token_used + N`),
    /// never as read-modify-write across round trips, so two concurrent
    /// commits for the same (user, month) both land.
    pub async fn commit(
        &self,
        role: UserRole,
        entry: &UsageLogEntry,
        month: &str,
    ) -> Result<(), LetivoError> {
        let row = entry.clone();
        let month = month.to_string();
        let default_limit = self.default_limit(role);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                // The row normally exists from the pre-check, but a commit
                // landing just after a month rollover still needs one.
                tx.execute(
                    "INSERT OR IGNORE INTO quota_records (user_id, month, token_limit) \
                     VALUES (?1, ?2, ?3)",
                    rusqlite::params![row.user_id, month, default_limit],
                )?;
                tx.execute(
                    "UPDATE quota_records \
                     SET token_used = token_used + ?3, \
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
                     WHERE user_id = ?1 AND month = ?2",
                    rusqlite::params![row.user_id, month, row.total_tokens],
                )?;
                tx.execute(
                    "INSERT INTO usage_log (id, user_id, provider, model, prompt_tokens, \
                     completion_tokens, total_tokens, cost_usd, cost_brl, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                    rusqlite::params![
                        row.id,
                        row.user_id,
                        row.provider,
                        row.model,
                        row.prompt_tokens,
                        row.completion_tokens,
                        row.total_tokens,
                        row.cost_usd,
                        row.cost_brl,
                        row.created_at,
                    ],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        info!(
            user_id = %entry.user_id,
            provider = %entry.provider,
            model = %entry.model,
            total_tokens = entry.total_tokens,
            cost_usd = entry.cost_usd,
            "usage committed"
        );
        Ok(())
    }

    /// Zero the month's usage counter. Admin operation.
    pub async fn reset(&self, user_id: &str, month: &str) -> Result<(), LetivoError> {
        let uid = user_id.to_string();
        let m = month.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE quota_records \
                     SET token_used = 0, \
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') \
                     WHERE user_id = ?1 AND month = ?2",
                    rusqlite::params![uid, m],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        info!(user_id = %user_id, month = %month, "quota reset");
        Ok(())
    }

    /// Set the month's token limit, creating the row if absent. Admin
    /// operation.
    pub async fn update_limit(
        &self,
        user_id: &str,
        month: &str,
        new_limit: u64,
    ) -> Result<(), LetivoError> {
        let uid = user_id.to_string();
        let m = month.to_string();
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO quota_records (user_id, month, token_limit) \
                     VALUES (?1, ?2, ?3) \
                     ON CONFLICT (user_id, month) DO UPDATE SET \
                         token_limit = excluded.token_limit, \
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                    rusqlite::params![uid, m, new_limit],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        info!(user_id = %user_id, month = %month, new_limit, "quota limit updated");
        Ok(())
    }
}

/// Build a usage log entry for one completed request.
pub fn usage_entry(
    user_id: &str,
    provider: &str,
    model: &str,
    usage: &TokenUsage,
    cost_usd: f64,
    cost_brl: f64,
) -> UsageLogEntry {
    UsageLogEntry {
        id: uuid::Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        provider: provider.to_string(),
        model: model.to_string(),
        prompt_tokens: usage.prompt_tokens,
        completion_tokens: usage.completion_tokens,
        total_tokens: usage.total_tokens,
        cost_usd,
        cost_brl,
        created_at: chrono::Utc::now()
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string(),
    }
}
