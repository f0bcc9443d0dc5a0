// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database bootstrap: connection opening, pragmas, and migrations.

use std::path::Path;

use letivo_core::LetivoError;
use letivo_config::model::StorageConfig;
use tracing::info;

use crate::migrations::run_migrations;

/// Open the Letivo database, apply pragmas, and run pending migrations.
///
/// The returned connection drives all storage access through the single
/// tokio-rusqlite background thread.
pub async fn open_database(
    config: &StorageConfig,
) -> Result<tokio_rusqlite::Connection, LetivoError> {
    if let Some(parent) = Path::new(&config.database_path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(LetivoError::storage)?;
    }

    let conn = tokio_rusqlite::Connection::open(&config.database_path)
        .await
        .map_err(|e| LetivoError::Storage {
            source: Box::new(e),
        })?;

    let wal_mode = config.wal_mode;
    conn.call(move |conn| -> Result<(), rusqlite::Error> {
        if wal_mode {
            conn.pragma_update(None, "journal_mode", "WAL")?;
        }
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "busy_timeout", 5000)?;
        Ok(())
    })
    .await
    .map_err(|e| LetivoError::Storage {
        source: Box::new(e),
    })?;

    run_embedded_migrations(&conn).await?;

    info!(path = %config.database_path, wal = config.wal_mode, "database ready");
    Ok(conn)
}

/// Open an in-memory database with migrations applied. Used by tests
/// across the workspace.
pub async fn open_in_memory() -> Result<tokio_rusqlite::Connection, LetivoError> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
        .await
        .map_err(|e| LetivoError::Storage {
            source: Box::new(e),
        })?;
    run_embedded_migrations(&conn).await?;
    Ok(conn)
}

async fn run_embedded_migrations(
    conn: &tokio_rusqlite::Connection,
) -> Result<(), LetivoError> {
    conn.call(|conn| -> Result<Result<(), LetivoError>, rusqlite::Error> {
        Ok(run_migrations(conn))
    })
    .await
    .map_err(|e| LetivoError::Storage {
        source: Box::new(e),
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_database_has_quota_tables() {
        let conn = open_in_memory().await.unwrap();
        let count: i64 = conn
            .call(|conn| -> Result<i64, rusqlite::Error> {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' \
                     AND name IN ('quota_records', 'usage_log')",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let conn = open_in_memory().await.unwrap();
        // Running again must be a no-op, not a duplicate-table error.
        conn.call(|conn| -> Result<Result<(), LetivoError>, rusqlite::Error> {
            Ok(run_migrations(conn))
        })
        .await
        .unwrap()
        .unwrap();
    }

    #[tokio::test]
    async fn open_database_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/letivo.db");
        let config = StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        };
        let _conn = open_database(&config).await.unwrap();
        assert!(path.exists());
    }
}
