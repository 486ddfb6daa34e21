// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Meeting links: `!setlink <subject> <url>` and the `"<subject> link"`
//! lookup pattern.
//!
//! Lookups go cache-first. The cache mirrors persisted entries after the
//! first store hit and is refreshed by `!setlink`; there is no TTL.

use famulus_core::types::{InboundEvent, MeetLink, OutboundMessage};
use famulus_core::FamulusError;
use tracing::debug;

use crate::AgentContext;

/// Creates or replaces the link for a subject. The URL is the last
/// whitespace-separated token; everything before it is the subject.
pub(crate) async fn set(
    ctx: &AgentContext,
    event: &InboundEvent,
    args: &str,
) -> Result<(), FamulusError> {
    let tokens: Vec<&str> = args.split_whitespace().collect();
    let reply = if tokens.len() < 2 {
        "*Syntax Error!*\nUsage: !setlink <subject> <url>".to_string()
    } else {
        let link = tokens[tokens.len() - 1];
        if !(link.starts_with("http://") || link.starts_with("https://")) {
            "Please give a valid http(s) URL. 😒".to_string()
        } else {
            let subject = tokens[..tokens.len() - 1].join(" ");
            ctx.store.upsert_link(&subject, link).await?;
            ctx.links.insert(
                subject.to_lowercase(),
                MeetLink {
                    subject: subject.clone(),
                    link: link.to_string(),
                },
            );
            format!("Link for *{subject}* saved. 🔗")
        }
    };

    ctx.channel
        .send(OutboundMessage::text(event.conversation_id.clone(), reply))
        .await?;
    Ok(())
}

/// Answers "<subject> link" with the stored URL. Unknown subjects stay
/// unanswered, since the suffix pattern also matches ordinary chatter.
pub(crate) async fn lookup(
    ctx: &AgentContext,
    event: &InboundEvent,
    subject: &str,
) -> Result<(), FamulusError> {
    let key = subject.to_lowercase();

    let found = match ctx.links.get(&key) {
        Some(entry) => Some(entry.link.clone()),
        None => match ctx.store.get_link(subject).await? {
            Some(entry) => {
                let link = entry.link.clone();
                ctx.links.insert(key, entry);
                Some(link)
            }
            None => None,
        },
    };

    match found {
        Some(link) => {
            ctx.channel
                .send(OutboundMessage::text(event.conversation_id.clone(), link))
                .await?;
        }
        None => {
            debug!(subject, "no meet link for subject");
        }
    }
    Ok(())
}
