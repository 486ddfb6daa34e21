// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The singleton list: `!list`, `!li <items>`, `!dlist`, `!dl <n>`.
//!
//! "Document absent" and "document present with zero items" answer with
//! different replies, so the two states are kept distinguishable all the
//! way down to the store.

use famulus_core::types::{InboundEvent, OutboundMessage};
use famulus_core::FamulusError;

use crate::AgentContext;

async fn reply(ctx: &AgentContext, event: &InboundEvent, text: impl Into<String>) -> Result<(), FamulusError> {
    ctx.channel
        .send(OutboundMessage::text(event.conversation_id.clone(), text))
        .await?;
    Ok(())
}

/// Shows the numbered items.
pub(crate) async fn show(ctx: &AgentContext, event: &InboundEvent) -> Result<(), FamulusError> {
    match ctx.store.get_list().await? {
        None => reply(ctx, event, "Your list is empty.").await,
        Some(items) if items.is_empty() => reply(ctx, event, "Your list is empty!").await,
        Some(items) => {
            let numbered: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(index, item)| format!("{}. {item}", index + 1))
                .collect();
            reply(ctx, event, numbered.join("\n")).await
        }
    }
}

/// Appends space-separated items, creating the document on first use.
pub(crate) async fn add(
    ctx: &AgentContext,
    event: &InboundEvent,
    args: &str,
) -> Result<(), FamulusError> {
    let items: Vec<String> = args.split_whitespace().map(str::to_string).collect();
    if items.is_empty() {
        return reply(ctx, event, "*Syntax Error!*\nUsage: !li <items separated by space>").await;
    }

    let count = items.len();
    match ctx.store.get_list().await? {
        Some(mut existing) => {
            existing.extend(items);
            ctx.store.put_list(&existing).await?;
            reply(ctx, event, format!("*+* {count} items added to list! 🖊️")).await
        }
        None => {
            ctx.store.put_list(&items).await?;
            reply(
                ctx,
                event,
                format!("*List created!* {count} items added to list! 🖊️"),
            )
            .await
        }
    }
}

/// Deletes the whole list document.
pub(crate) async fn delete(ctx: &AgentContext, event: &InboundEvent) -> Result<(), FamulusError> {
    if ctx.store.delete_list().await? {
        reply(ctx, event, "List deleted.🤞").await
    } else {
        reply(ctx, event, "Your list is empty.").await
    }
}

/// Removes the item at a 1-based index.
pub(crate) async fn remove_item(
    ctx: &AgentContext,
    event: &InboundEvent,
    args: &str,
) -> Result<(), FamulusError> {
    let mut tokens = args.split_whitespace();
    let (Some(first), None) = (tokens.next(), tokens.next()) else {
        return reply(
            ctx,
            event,
            "Syntax Error! [dl <index>]\nPlease give only one index at a time.)",
        )
        .await;
    };
    let Ok(index) = first.parse::<i64>() else {
        return reply(
            ctx,
            event,
            "Syntax Error! [dl <index>]\nPlease give only one index at a time.)",
        )
        .await;
    };
    if index < 1 {
        return reply(ctx, event, "!dl <Enter a valid Integer> 😠").await;
    }

    let Some(mut items) = ctx.store.get_list().await? else {
        return reply(ctx, event, "Your list is empty. 😏").await;
    };
    let position = (index - 1) as usize;
    if position >= items.len() {
        return reply(ctx, event, "Item doesn't exists in list. 😏").await;
    }

    let removed = items.remove(position);
    ctx.store.put_list(&items).await?;
    reply(ctx, event, format!("*-* {removed} removed from your list. 😀")).await
}
