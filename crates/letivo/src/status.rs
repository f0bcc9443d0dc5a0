// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `letivo status` command implementation.
//!
//! Probes the gateway health endpoint and reports whether the service is
//! running. Falls back gracefully when nothing is listening.

use std::collections::BTreeMap;
use std::time::Duration;

use letivo_config::model::LetivoConfig;
use letivo_core::LetivoError;
use serde::{Deserialize, Serialize};

/// Health endpoint response from the gateway.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    uptime_secs: u64,
    /// Per-provider probe result, keyed by provider name.
    #[serde(default)]
    providers: BTreeMap<String, String>,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub uptime_secs: Option<u64>,
    pub uptime_human: Option<String>,
    pub providers: BTreeMap<String, String>,
    pub gateway_host: String,
    pub gateway_port: u16,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Run the `letivo status` command.
pub async fn run_status(config: &LetivoConfig, json: bool) -> Result<(), LetivoError> {
    let host = &config.gateway.host;
    let port = config.gateway.port;
    let url = format!("http://{host}:{port}/v1/health");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
        .map_err(|e| LetivoError::Internal(format!("failed to create HTTP client: {e}")))?;

    let response = match client.get(&url).send().await {
        Ok(resp) if resp.status().is_success() => {
            let health: HealthResponse = resp.json().await.map_err(|e| {
                LetivoError::Internal(format!("failed to parse health response: {e}"))
            })?;
            StatusResponse {
                running: true,
                status: health.status,
                uptime_secs: Some(health.uptime_secs),
                uptime_human: Some(format_uptime(health.uptime_secs)),
                providers: health.providers,
                gateway_host: host.clone(),
                gateway_port: port,
            }
        }
        _ => StatusResponse {
            running: false,
            status: "not running".to_string(),
            uptime_secs: None,
            uptime_human: None,
            providers: BTreeMap::new(),
            gateway_host: host.clone(),
            gateway_port: port,
        },
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&response).unwrap_or_else(|_| "{}".to_string())
        );
    } else {
        print_status(&response);
    }

    Ok(())
}

fn print_status(response: &StatusResponse) {
    println!();
    println!("  letivo status");
    println!("  {}", "-".repeat(35));
    if response.running {
        let uptime = response.uptime_human.as_deref().unwrap_or("0m");
        println!("    State:     [OK] {} (uptime: {uptime})", response.status);
        let providers: Vec<String> = response
            .providers
            .iter()
            .map(|(name, health)| format!("{name} ({health})"))
            .collect();
        println!("    Providers: {}", providers.join(", "));
    } else {
        println!("    State:     [FAIL] not running");
        println!(
            "    Endpoint:  http://{}:{}/v1/health",
            response.gateway_host, response.gateway_port
        );
        println!();
        println!("  Start with: letivo serve");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_uptime_minutes() {
        assert_eq!(format_uptime(120), "2m");
    }

    #[test]
    fn format_uptime_hours() {
        assert_eq!(format_uptime(3720), "1h 2m");
    }

    #[test]
    fn format_uptime_days() {
        assert_eq!(format_uptime(90060), "1d 1h 1m");
    }

    #[test]
    fn health_response_parses_provider_map() {
        let json = r#"{
            "status": "degraded",
            "version": "0.1.0",
            "uptime_secs": 5,
            "providers": {"gemini": "healthy", "openai": "unhealthy: boom"}
        }"#;
        let health: HealthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(health.providers["gemini"], "healthy");
        assert_eq!(health.providers["openai"], "unhealthy: boom");
    }

    #[test]
    fn status_response_serializes() {
        let resp = StatusResponse {
            running: true,
            status: "ok".to_string(),
            uptime_secs: Some(3600),
            uptime_human: Some("1h 0m".to_string()),
            providers: BTreeMap::from([
                ("gemini".to_string(), "healthy".to_string()),
                ("openai".to_string(), "healthy".to_string()),
            ]),
            gateway_host: "127.0.0.1".to_string(),
            gateway_port: 8080,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"running\":true"));
        assert!(json.contains("\"gemini\""));
    }

    #[test]
    fn status_response_offline_serializes() {
        let resp = StatusResponse {
            running: false,
            status: "not running".to_string(),
            uptime_secs: None,
            uptime_human: None,
            providers: BTreeMap::new(),
            gateway_host: "127.0.0.1".to_string(),
            gateway_port: 8080,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"running\":false"));
    }
}
