// SPDX-FileCopyrightText: 2026 Letivo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use letivo_config::model::GatewayConfig;
use letivo_core::LetivoError;
use letivo_quota::QuotaLedger;
use letivo_router::{Orchestrator, ProviderRegistry};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The request pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Quota ledger, used directly by the quota and admin endpoints.
    pub ledger: Arc<QuotaLedger>,
    /// Registered providers, reported by the health endpoint.
    pub registry: ProviderRegistry,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Process start time for uptime reporting.
    pub start_time: std::time::Instant,
}

/// Build the gateway router.
///
/// Split out from [`start_server`] so tests can serve it on an ephemeral
/// port.
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    // Health stays reachable without a token so process supervisors can
    // probe it.
    let public_routes = Router::new()
        .route("/v1/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/v1/chat", post(handlers::post_chat))
        .route("/v1/quota", get(handlers::get_quota))
        .route("/v1/admin/quota/reset", post(handlers::post_quota_reset))
        .route("/v1/admin/quota/limit", post(handlers::post_quota_limit))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server and serve until shutdown.
///
/// On SIGINT the server stops accepting connections and every registered
/// provider is shut down in order before this returns.
pub async fn start_server(config: &GatewayConfig, state: GatewayState) -> Result<(), LetivoError> {
    let registry = state.registry.clone();
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LetivoError::Config(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LetivoError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("gateway stopping, shutting providers down");
    registry.shutdown_all().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install shutdown signal handler");
        std::future::pending::<()>().await;
    }
}
