// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notes: `!notes`, `!note <text>`, `!del <text>`.

use famulus_core::types::{InboundEvent, OutboundMessage};
use famulus_core::FamulusError;

use crate::AgentContext;

/// Lists every persisted note, one message per note, 1-indexed.
pub(crate) async fn show_all(ctx: &AgentContext, event: &InboundEvent) -> Result<(), FamulusError> {
    let notes = ctx.store.list_notes().await?;
    if notes.is_empty() {
        ctx.channel
            .send(OutboundMessage::text(
                event.conversation_id.clone(),
                "No Notes found! Add using !note <text>",
            ))
            .await?;
        return Ok(());
    }

    for (index, note) in notes.iter().enumerate() {
        ctx.channel
            .send(OutboundMessage::text(
                event.conversation_id.clone(),
                format!("{}. {}", index + 1, note.text),
            ))
            .await?;
    }
    Ok(())
}

/// Creates one note and echoes it back.
pub(crate) async fn create(
    ctx: &AgentContext,
    event: &InboundEvent,
    text: &str,
) -> Result<(), FamulusError> {
    if text.is_empty() {
        ctx.channel
            .send(OutboundMessage::text(
                event.conversation_id.clone(),
                "*Syntax Error!*\nUsage: !note <text>",
            ))
            .await?;
        return Ok(());
    }

    let note = ctx.store.create_note(text).await?;
    ctx.channel
        .send(OutboundMessage::text(
            event.conversation_id.clone(),
            format!("{} ✅", note.text),
        ))
        .await?;
    Ok(())
}

/// Deletes every note whose text matches exactly and reports the count.
pub(crate) async fn delete(
    ctx: &AgentContext,
    event: &InboundEvent,
    text: &str,
) -> Result<(), FamulusError> {
    let deleted = ctx.store.delete_notes_by_text(text).await?;
    let reply = if deleted == 0 {
        format!("{text} not found in notes❓")
    } else {
        format!("{text} ❌ - {deleted} notes were deleted!")
    };
    ctx.channel
        .send(OutboundMessage::text(event.conversation_id.clone(), reply))
        .await?;
    Ok(())
}
