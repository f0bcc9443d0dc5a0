// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unified error type for the Letivo orchestration router.

use std::time::Duration;

use thiserror::Error;

/// All errors that can occur across Letivo subsystems.
#[derive(Debug, Error)]
pub enum LetivoError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// SQLite storage failure.
    #[error("storage error: {source}")]
    Storage {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An AI provider call failed.
    #[error("provider error: {message}")]
    Provider {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The user's monthly token quota does not allow this request.
    #[error("quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// Every candidate in the routing chain failed.
    #[error("all providers exhausted for module `{module}` tier `{tier}` after {attempts} attempts")]
    AllProvidersExhausted {
        module: String,
        tier: String,
        attempts: usize,
    },

    /// Caller-supplied input failed validation.
    #[error("invalid input: {0}")]
    Invalid(String),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LetivoError {
    /// Wrap any error as a storage error.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(source),
        }
    }

    /// Build a provider error from a plain message.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
            source: None,
        }
    }

    /// True when the error message looks like an upstream quota or
    /// rate-limit rejection. Such candidates are skipped without retry:
    /// hammering a rate-limited provider wastes the request deadline.
    pub fn is_quota_like(&self) -> bool {
        let message = match self {
            Self::Provider { message, .. } => message,
            Self::QuotaExceeded { message } => message,
            _ => return false,
        };
        let lower = message.to_lowercase();
        lower.contains("quota") || lower.contains("rate limit") || lower.contains("429")
    }
}
