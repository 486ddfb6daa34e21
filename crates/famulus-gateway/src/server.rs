// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use famulus_agent::AgentContext;
use famulus_core::FamulusError;
use tower_http::cors::CorsLayer;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The running agent's context: channel, runtime flags, config.
    pub ctx: Arc<AgentContext>,
}

/// Builds the gateway router:
/// - GET / (public status page)
/// - POST /webhook (public, redacted forwarding)
/// - POST /sleep (guarded by the shared secret)
pub fn router(state: GatewayState) -> Router {
    let auth = AuthConfig {
        shared_secret: state.ctx.config.gateway.shared_secret.clone(),
    };

    let public_routes = Router::new()
        .route("/", get(handlers::get_status))
        .route("/webhook", post(handlers::post_webhook))
        .with_state(state.clone());

    let guarded_routes = Router::new()
        .route("/sleep", post(handlers::post_sleep))
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(guarded_routes)
        .layer(CorsLayer::permissive())
}

/// Binds to the configured host:port and serves the gateway until the
/// process exits.
pub async fn start_server(state: GatewayState) -> Result<(), FamulusError> {
    let gateway = &state.ctx.config.gateway;
    let addr = format!("{}:{}", gateway.host, gateway.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| FamulusError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, router(state))
        .await
        .map_err(|e| FamulusError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
