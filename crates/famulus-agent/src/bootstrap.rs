// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session bootstrap: resume a persisted channel session or walk the
//! QR pairing handshake, then announce readiness.

use std::time::Instant;

use famulus_core::traits::{ChannelAdapter, StoreAdapter};
use famulus_core::types::{ConversationId, OutboundMessage, TransportEvent};
use famulus_core::FamulusError;
use tracing::{debug, info};

use crate::qr;

/// Connects the channel and drives transport events until it reports
/// ready. Fresh pairings print a terminal QR and persist the credential
/// the channel hands back; later runs resume from that credential.
pub async fn establish(
    channel: &mut dyn ChannelAdapter,
    store: &dyn StoreAdapter,
    owner: Option<&str>,
    started_at: Instant,
) -> Result<(), FamulusError> {
    let resume = store.load_credential().await?;
    if resume.is_some() {
        info!("found a persisted session credential, resuming");
    }
    channel.connect(resume).await?;

    loop {
        match channel.next_event().await? {
            TransportEvent::Qr { code } => {
                let rendered = qr::render_terminal(&code)?;
                println!("{rendered}");
                info!("pairing QR printed, scan it with the phone");
            }
            TransportEvent::Authenticated { credential } => {
                store.save_credential(&credential).await?;
                info!("session credential persisted");
            }
            TransportEvent::AuthFailure { reason } => {
                return Err(FamulusError::AuthFailure(reason));
            }
            TransportEvent::Ready => break,
            TransportEvent::Message(event) => {
                debug!(id = %event.id, "message before ready, ignoring");
            }
        }
    }

    if let Some(owner) = owner {
        channel
            .send(OutboundMessage::text(
                ConversationId::from(owner),
                "Notes bot is up and running! ✅🌍",
            ))
            .await?;
    }
    let uptime = crate::format_uptime(started_at.elapsed());
    channel.set_status(&format!("Uptime: {uptime}")).await?;
    info!("channel session established");
    Ok(())
}
