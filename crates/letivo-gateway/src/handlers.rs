// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Handles POST /v1/chat, GET /v1/quota, and the admin quota endpoints.
//! Identity arrives in `x-user-id` / `x-user-role` headers, resolved by
//! the platform in front of this service. Error bodies carry
//! user-presentable Portuguese messages; operational detail goes to logs.

use std::collections::BTreeMap;
use std::str::FromStr;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use letivo_core::{ComplexityTier, HealthStatus, LetivoError, TokenUsage, UserRole};
use letivo_quota::current_month;
use letivo_router::ChatRequest;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::server::GatewayState;

/// Request body for POST /v1/chat.
#[derive(Debug, Deserialize)]
pub struct ChatBody {
    /// Message text.
    pub message: String,
    /// Optional module tag; skips classification when present.
    #[serde(default)]
    pub module: Option<String>,
    /// Optional provider preference for this request only.
    #[serde(default, alias = "preferredProvider")]
    pub preferred_provider: Option<String>,
}

/// Response body for POST /v1/chat.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub text: String,
    pub module: String,
    pub confidence: f32,
    pub tier: ComplexityTier,
    pub needs_images: bool,
    pub usage: TokenUsage,
    pub latency_ms: u64,
}

/// Response body for GET /v1/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    /// Per-provider probe result, keyed by provider name.
    pub providers: BTreeMap<String, String>,
}

/// Response body for GET /v1/quota.
#[derive(Debug, Serialize)]
pub struct QuotaResponse {
    pub month: String,
    pub allowed: bool,
    pub used: u64,
    pub limit: u64,
    pub remaining: u64,
}

/// Request body for POST /v1/admin/quota/reset.
#[derive(Debug, Deserialize)]
pub struct QuotaResetBody {
    pub user_id: String,
    /// Month key (`YYYY-MM`); defaults to the current month.
    #[serde(default)]
    pub month: Option<String>,
}

/// Request body for POST /v1/admin/quota/limit.
#[derive(Debug, Deserialize)]
pub struct QuotaLimitBody {
    pub user_id: String,
    pub limit: u64,
    #[serde(default)]
    pub month: Option<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Friendly message for failures the user cannot act on.
const TECHNICAL_DIFFICULTIES: &str =
    "Estamos com dificuldades técnicas no momento. Tente novamente em alguns instantes.";

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Map a pipeline error onto an HTTP response.
fn map_error(err: LetivoError) -> Response {
    match err {
        LetivoError::Invalid(message) => error_body(StatusCode::BAD_REQUEST, message),
        LetivoError::QuotaExceeded { message } => {
            error_body(StatusCode::TOO_MANY_REQUESTS, message)
        }
        LetivoError::AllProvidersExhausted { .. } => {
            error!(error = %err, "dispatch exhausted every provider");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, TECHNICAL_DIFFICULTIES)
        }
        other => {
            error!(error = %other, "request failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, TECHNICAL_DIFFICULTIES)
        }
    }
}

/// Resolve the caller identity from the forwarded headers.
///
/// A missing role defaults to `FREE`; a malformed role is a client error.
fn identity(headers: &HeaderMap) -> Result<(String, UserRole), Response> {
    let user_id = headers
        .get("x-user-id")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| {
            error_body(
                StatusCode::UNAUTHORIZED,
                "cabeçalho x-user-id ausente".to_string(),
            )
        })?;

    let role = match headers.get("x-user-role").and_then(|v| v.to_str().ok()) {
        Some(raw) => UserRole::from_str(raw.trim()).map_err(|_| {
            error_body(
                StatusCode::BAD_REQUEST,
                format!("papel de usuário inválido: {raw}"),
            )
        })?,
        None => UserRole::Free,
    };

    Ok((user_id.to_string(), role))
}

/// POST /v1/chat
///
/// Runs one message through the orchestration pipeline and returns the
/// normalized response, with the serving provider and model exposed as
/// `X-Provider` / `X-Model` response headers.
pub async fn post_chat(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<ChatBody>,
) -> Response {
    let (user_id, role) = match identity(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let request = ChatRequest {
        user_id,
        role,
        message: body.message,
        module: body.module,
        preferred_provider: body.preferred_provider,
    };

    match state.orchestrator.handle(request).await {
        Ok(outcome) => {
            let chat = ChatResponse {
                text: outcome.response.text,
                module: outcome.classification.module,
                confidence: outcome.classification.confidence,
                tier: outcome.tier,
                needs_images: outcome.classification.needs_images,
                usage: outcome.response.usage,
                latency_ms: outcome.response.latency_ms,
            };
            (
                StatusCode::OK,
                [
                    ("x-provider", outcome.response.provider),
                    ("x-model", outcome.response.model),
                ],
                Json(chat),
            )
                .into_response()
        }
        Err(err) => map_error(err),
    }
}

/// Render a provider probe outcome for the health body.
fn health_label(probe: Result<HealthStatus, LetivoError>) -> String {
    match probe {
        Ok(HealthStatus::Healthy) => "healthy".to_string(),
        Ok(HealthStatus::Degraded(detail)) => format!("degraded: {detail}"),
        Ok(HealthStatus::Unhealthy(detail)) => format!("unhealthy: {detail}"),
        Err(e) => format!("unhealthy: {e}"),
    }
}

/// GET /v1/health
///
/// Probes every registered provider; overall status is `ok` only when all
/// probes come back healthy.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let mut providers = BTreeMap::new();
    for adapter in state.registry.adapters() {
        let label = health_label(adapter.health_check().await);
        providers.insert(adapter.name().to_string(), label);
    }
    let status = if providers.values().all(|s| s == "healthy") {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        providers,
    })
}

/// GET /v1/quota
///
/// Current month's quota status for the calling user.
pub async fn get_quota(State(state): State<GatewayState>, headers: HeaderMap) -> Response {
    let (user_id, role) = match identity(&headers) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let month = current_month();
    match state.ledger.check(&user_id, role, &month).await {
        Ok(status) => (
            StatusCode::OK,
            Json(QuotaResponse {
                month,
                allowed: status.allowed,
                used: status.used,
                limit: status.limit,
                remaining: status.remaining,
            }),
        )
            .into_response(),
        Err(err) => map_error(err),
    }
}

/// Require the admin role; everyone else gets 403.
fn require_admin(headers: &HeaderMap) -> Result<(), Response> {
    let (_, role) = identity(headers)?;
    if role != UserRole::Admin {
        return Err(error_body(
            StatusCode::FORBIDDEN,
            "operação restrita a administradores".to_string(),
        ));
    }
    Ok(())
}

/// POST /v1/admin/quota/reset
pub async fn post_quota_reset(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<QuotaResetBody>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }

    let month = body.month.unwrap_or_else(current_month);
    match state.ledger.reset(&body.user_id, &month).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => map_error(err),
    }
}

/// POST /v1/admin/quota/limit
pub async fn post_quota_limit(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<QuotaLimitBody>,
) -> Response {
    if let Err(response) = require_admin(&headers) {
        return response;
    }

    let month = body.month.unwrap_or_else(current_month);
    match state.ledger.update_limit(&body.user_id, &month, body.limit).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => map_error(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_body_deserializes_with_message_only() {
        let json = r#"{"message": "Qual a capital do Brasil?"}"#;
        let body: ChatBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.message, "Qual a capital do Brasil?");
        assert!(body.module.is_none());
        assert!(body.preferred_provider.is_none());
    }

    #[test]
    fn chat_body_accepts_camel_case_preferred_provider() {
        let json = r#"{"message": "oi", "preferredProvider": "perplexity"}"#;
        let body: ChatBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.preferred_provider.as_deref(), Some("perplexity"));
    }

    #[test]
    fn chat_body_accepts_snake_case_preferred_provider() {
        let json = r#"{"message": "oi", "preferred_provider": "grok"}"#;
        let body: ChatBody = serde_json::from_str(json).unwrap();
        assert_eq!(body.preferred_provider.as_deref(), Some("grok"));
    }

    #[test]
    fn identity_requires_user_id() {
        let headers = HeaderMap::new();
        assert!(identity(&headers).is_err());
    }

    #[test]
    fn identity_defaults_role_to_free() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "u1".parse().unwrap());
        let (user_id, role) = identity(&headers).unwrap();
        assert_eq!(user_id, "u1");
        assert_eq!(role, UserRole::Free);
    }

    #[test]
    fn identity_parses_role_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "u1".parse().unwrap());
        headers.insert("x-user-role", "premium".parse().unwrap());
        let (_, role) = identity(&headers).unwrap();
        assert_eq!(role, UserRole::Premium);
    }

    #[test]
    fn identity_rejects_unknown_role() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "u1".parse().unwrap());
        headers.insert("x-user-role", "superuser".parse().unwrap());
        assert!(identity(&headers).is_err());
    }

    #[test]
    fn require_admin_rejects_free_role() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "u1".parse().unwrap());
        headers.insert("x-user-role", "FREE".parse().unwrap());
        assert!(require_admin(&headers).is_err());
    }

    #[test]
    fn require_admin_accepts_admin_role() {
        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", "root".parse().unwrap());
        headers.insert("x-user-role", "ADMIN".parse().unwrap());
        assert!(require_admin(&headers).is_ok());
    }

    #[test]
    fn health_label_covers_every_probe_outcome() {
        assert_eq!(health_label(Ok(HealthStatus::Healthy)), "healthy");
        assert_eq!(
            health_label(Ok(HealthStatus::Degraded("lento".to_string()))),
            "degraded: lento"
        );
        assert_eq!(
            health_label(Ok(HealthStatus::Unhealthy("sem resposta".to_string()))),
            "unhealthy: sem resposta"
        );
        assert!(health_label(Err(LetivoError::provider("boom"))).starts_with("unhealthy"));
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: TECHNICAL_DIFFICULTIES.to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("dificuldades técnicas"));
    }

    #[test]
    fn quota_reset_body_month_is_optional() {
        let json = r#"{"user_id": "u1"}"#;
        let body: QuotaResetBody = serde_json::from_str(json).unwrap();
        assert!(body.month.is_none());
    }
}
