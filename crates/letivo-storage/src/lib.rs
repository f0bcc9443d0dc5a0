// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Letivo orchestration router.
//!
//! Owns the schema (embedded refinery migrations) and connection bootstrap.
//! Query logic for quota accounting lives in `letivo-quota`, which operates
//! on the connection handed out here.

pub mod database;
pub mod migrations;
pub mod models;

pub use database::{open_database, open_in_memory};
pub use models::{QuotaRecord, UsageLogEntry};
