// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks semantic constraints that serde attributes cannot express, such
//! as known provider names in routing chains and consistent complexity
//! thresholds.

use crate::diagnostic::ConfigError;
use crate::model::LetivoConfig;

/// Provider identifiers that routing chains may reference.
pub const KNOWN_PROVIDERS: &[&str] = &["openai", "gemini", "grok", "perplexity"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with every collected error (does not fail fast).
pub fn validate_config(config: &LetivoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.service.max_message_chars == 0 {
        errors.push(ConfigError::Validation {
            message: "service.max_message_chars must be at least 1".to_string(),
        });
    }

    if config.quota.usd_to_brl_rate <= 0.0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "quota.usd_to_brl_rate must be positive, got {}",
                config.quota.usd_to_brl_rate
            ),
        });
    }

    let threshold = config.classifier.confidence_threshold;
    if !(0.0..=1.0).contains(&threshold) {
        errors.push(ConfigError::Validation {
            message: format!(
                "classifier.confidence_threshold must be within [0.0, 1.0], got {threshold}"
            ),
        });
    }

    if config.classifier.cache_max_entries == 0 {
        errors.push(ConfigError::Validation {
            message: "classifier.cache_max_entries must be at least 1".to_string(),
        });
    }

    if let Some(provider) = &config.classifier.refine_provider
        && !KNOWN_PROVIDERS.contains(&provider.as_str())
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "classifier.refine_provider `{provider}` is not one of: {}",
                KNOWN_PROVIDERS.join(", ")
            ),
        });
    }

    if config.complexity.trivial_max_chars >= config.complexity.complex_min_chars {
        errors.push(ConfigError::Validation {
            message: format!(
                "complexity.trivial_max_chars ({}) must be below complexity.complex_min_chars ({})",
                config.complexity.trivial_max_chars, config.complexity.complex_min_chars
            ),
        });
    }

    if config.routing.attempt_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "routing.attempt_timeout_secs must be at least 1".to_string(),
        });
    }

    for (tier, chain) in [
        ("trivial", &config.routing.trivial),
        ("simple", &config.routing.simple),
        ("complex", &config.routing.complex),
    ] {
        if chain.is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("routing.{tier} must list at least one provider/model pair"),
            });
        }
        for target in chain {
            if !KNOWN_PROVIDERS.contains(&target.provider.as_str()) {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "routing.{tier} references unknown provider `{}`; valid providers: {}",
                        target.provider,
                        KNOWN_PROVIDERS.join(", ")
                    ),
                });
            }
            if target.model.trim().is_empty() {
                errors.push(ConfigError::Validation {
                    message: format!(
                        "routing.{tier} has an empty model for provider `{}`",
                        target.provider
                    ),
                });
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RouteTarget;

    #[test]
    fn default_config_validates() {
        let config = LetivoConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = LetivoConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))
        ));
    }

    #[test]
    fn unknown_routing_provider_fails_validation() {
        let mut config = LetivoConfig::default();
        config.routing.simple = vec![RouteTarget::new("anthropic", "claude-3")];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("anthropic"))
        ));
    }

    #[test]
    fn empty_tier_chain_fails_validation() {
        let mut config = LetivoConfig::default();
        config.routing.complex = vec![];
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("routing.complex"))
        ));
    }

    #[test]
    fn out_of_range_confidence_threshold_fails() {
        let mut config = LetivoConfig::default();
        config.classifier.confidence_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("confidence_threshold"))
        ));
    }

    #[test]
    fn inverted_complexity_thresholds_fail() {
        let mut config = LetivoConfig::default();
        config.complexity.trivial_max_chars = 300;
        config.complexity.complex_min_chars = 150;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("trivial_max_chars"))
        ));
    }

    #[test]
    fn negative_brl_rate_fails() {
        let mut config = LetivoConfig::default();
        config.quota.usd_to_brl_rate = -1.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(
            |e| matches!(e, ConfigError::Validation { message } if message.contains("usd_to_brl_rate"))
        ));
    }
}
