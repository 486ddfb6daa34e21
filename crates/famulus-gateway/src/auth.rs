// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared-secret authentication for the guarded gateway routes.
//!
//! The sleep endpoint expects the configured secret in the
//! `X-Famulus-Secret` header. With no secret configured the endpoint is
//! disabled outright (503), so a forgotten config key can never leave the
//! route open.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};

pub const SECRET_HEADER: &str = "x-famulus-secret";

/// Authentication configuration for the guarded routes.
#[derive(Clone)]
pub struct AuthConfig {
    /// Expected shared secret. `None` disables the guarded routes.
    pub shared_secret: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "shared_secret",
                &self.shared_secret.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

/// Middleware validating the `X-Famulus-Secret` header.
///
/// 503 when no secret is configured, 401 on a missing or wrong header.
pub async fn auth_middleware(
    State(auth): State<AuthConfig>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let Some(ref expected) = auth.shared_secret else {
        tracing::warn!("guarded route called but no shared secret is configured");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    };

    let presented = request
        .headers()
        .get(SECRET_HEADER)
        .and_then(|v| v.to_str().ok());

    match presented {
        Some(secret) if secret == expected => Ok(next.run(request).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
