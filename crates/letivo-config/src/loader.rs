// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! XDG hierarchy: `./letivo.toml` > `~/.config/letivo/letivo.toml` >
//! `/etc/letivo/letivo.toml`, with environment variable overrides via the
//! `LETIVO_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::LetivoConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/letivo/letivo.toml` (system-wide)
/// 3. `~/.config/letivo/letivo.toml` (user XDG config)
/// 4. `./letivo.toml` (local directory)
/// 5. `LETIVO_*` environment variables
pub fn load_config() -> Result<LetivoConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<LetivoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LetivoConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<LetivoConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(LetivoConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(LetivoConfig::default()))
        .merge(Toml::file("/etc/letivo/letivo.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("letivo/letivo.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("letivo.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because key names
/// themselves contain underscores: `LETIVO_GATEWAY_BEARER_TOKEN` must map
/// to `gateway.bearer_token`, not `gateway.bearer.token`.
fn env_provider() -> Env {
    Env::prefixed("LETIVO_").map(|key| {
        // `key` is the lowercased env var name with the prefix stripped,
        // e.g. LETIVO_QUOTA_USD_TO_BRL_RATE -> "quota_usd_to_brl_rate".
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("quota_", "quota.", 1)
            .replacen("classifier_", "classifier.", 1)
            .replacen("complexity_", "complexity.", 1)
            .replacen("routing_", "routing.", 1)
            .replacen("openai_", "openai.", 1)
            .replacen("gemini_", "gemini.", 1)
            .replacen("grok_", "grok.", 1)
            .replacen("perplexity_", "perplexity.", 1);
        mapped.into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_str_applies_overrides() {
        let config = load_config_from_str(
            r#"
[service]
max_message_chars = 500

[quota]
usd_to_brl_rate = 5.4
"#,
        )
        .unwrap();
        assert_eq!(config.service.max_message_chars, 500);
        assert!((config.quota.usd_to_brl_rate - 5.4).abs() < f64::EPSILON);
        // Everything else stays at defaults.
        assert_eq!(config.gateway.port, 8080);
    }

    #[test]
    fn load_from_str_rejects_unknown_section_key() {
        let result = load_config_from_str(
            r#"
[classifier]
cache_tll_secs = 10
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_string_yields_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.service.name, "letivo");
        assert_eq!(config.routing.max_retries, 1);
    }
}
