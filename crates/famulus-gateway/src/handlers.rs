// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.
//!
//! Handles GET /, POST /sleep, POST /webhook.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use famulus_agent::format_uptime;
use famulus_core::types::{ConversationId, OutboundMessage};

use crate::redact;
use crate::server::GatewayState;

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Whether the agent is processing events.
    pub active: bool,
    /// Whether only whitelisted conversations are answered.
    pub introvert_mode: bool,
    /// RFC 3339 local time of the request.
    pub timestamp: String,
    /// Process uptime as `HH:MM:SS`.
    pub uptime: String,
}

/// Response body for POST /sleep.
#[derive(Debug, Serialize)]
pub struct SleepResponse {
    /// Always "sleeping".
    pub status: String,
}

/// Request body for POST /webhook.
#[derive(Debug, Deserialize)]
pub struct WebhookRequest {
    /// Text to forward.
    pub text: String,
    /// Conversations to deliver to; the configured defaults when omitted.
    #[serde(default)]
    pub conversations: Option<Vec<String>>,
}

/// Response body for POST /webhook.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    /// Number of conversations the text was delivered to.
    pub delivered: usize,
}

/// GET /
///
/// Public status page. As a side effect, refreshes the channel status
/// text so the uptime stays visible from the phone.
pub async fn get_status(State(state): State<GatewayState>) -> Json<StatusResponse> {
    let ctx = &state.ctx;
    let uptime = format_uptime(ctx.started_at.elapsed());

    if let Err(e) = ctx
        .channel
        .set_status(&format!("Available 😃 (Uptime: {uptime})"))
        .await
    {
        warn!(error = %e, "failed to refresh channel status");
    }

    let runtime = ctx.state.read().await;
    Json(StatusResponse {
        active: runtime.active,
        introvert_mode: runtime.introvert,
        timestamp: chrono::Local::now().to_rfc3339(),
        uptime,
    })
}

/// POST /sleep
///
/// Pauses the agent for the night: announces it to the owner, updates the
/// channel status, and flips the active toggle off. `!start` from the
/// owner wakes it again. Auth happens in the route middleware.
pub async fn post_sleep(State(state): State<GatewayState>) -> Json<SleepResponse> {
    let ctx = &state.ctx;

    if let Err(e) = ctx
        .channel
        .set_status("Sleeping 😴😴😴 Will be available again from 12pm")
        .await
    {
        warn!(error = %e, "failed to set sleeping status");
    }
    if let Some(owner) = ctx.config.agent.owner.as_deref() {
        if let Err(e) = ctx
            .channel
            .send(OutboundMessage::text(
                ConversationId::from(owner),
                "I'm going to sleep in approx 25 mins,good night sur 😃",
            ))
            .await
        {
            warn!(error = %e, "failed to notify the owner");
        }
    }

    ctx.state.write().await.active = false;
    info!("sleep requested, agent paused");
    Json(SleepResponse {
        status: "sleeping".to_string(),
    })
}

/// POST /webhook
///
/// Forwards external notifications into chat. The text is passed through
/// the redaction rules first; delivery failures are logged and reflected
/// in the returned count rather than failing the request.
pub async fn post_webhook(
    State(state): State<GatewayState>,
    Json(body): Json<WebhookRequest>,
) -> Json<WebhookResponse> {
    let ctx = &state.ctx;
    let text = redact::redact(&body.text, &ctx.config.gateway.webhook_redact);
    let targets = body
        .conversations
        .unwrap_or_else(|| ctx.config.gateway.webhook_targets.clone());

    let mut delivered = 0;
    for conversation in &targets {
        let message = OutboundMessage::text(ConversationId::from(conversation.as_str()), &text);
        match ctx.channel.send(message).await {
            Ok(_) => delivered += 1,
            Err(e) => warn!(conversation, error = %e, "webhook delivery failed"),
        }
    }

    info!(delivered, targets = targets.len(), "webhook forwarded");
    Json(WebhookResponse { delivered })
}
