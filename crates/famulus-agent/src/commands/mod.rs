// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The stateless command table.
//!
//! Triggers are declared once, in a fixed order, with one of three
//! matchers. Resolution walks the table top to bottom and the first match
//! wins, which is what keeps `!list` from hitting the `!li` handler and
//! `!dlist` from hitting `!dl`. Messages that match nothing fall through
//! to the welcome greeting, unless they carry a `!` prefix, in which case
//! they stay unanswered.

pub mod exec;
pub mod links;
pub mod list;
pub mod media;
pub mod mention;
pub mod notes;
pub mod speech;
pub mod weather;
pub mod welcome;

use famulus_core::types::{InboundEvent, OutboundMessage};
use famulus_core::FamulusError;
use strum::Display;
use tracing::debug;

use crate::AgentContext;

/// How a trigger is compared against the message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    Exact,
    Prefix,
    Suffix,
}

/// Every command the table can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Command {
    Ping,
    Notes,
    Note,
    Del,
    List,
    DeleteList,
    RemoveItem,
    AddItems,
    Weather,
    TtsAll,
    TtsLang,
    Tts,
    SetLink,
    Run,
    Sticker,
    ToImage,
    Everyone,
    MeetLink,
}

/// The declared trigger table. Order is normative: exact entries shadow
/// the prefix entries they overlap with (`!notes` before `!note`,
/// `!dlist` before `!dl`, `!ttsall`/`!ttslang` before `!tts`).
const TRIGGERS: &[(Matcher, &str, Command)] = &[
    (Matcher::Exact, "!ping", Command::Ping),
    (Matcher::Exact, "!notes", Command::Notes),
    (Matcher::Prefix, "!note", Command::Note),
    (Matcher::Prefix, "!del", Command::Del),
    (Matcher::Exact, "!list", Command::List),
    (Matcher::Exact, "!dlist", Command::DeleteList),
    (Matcher::Prefix, "!dl", Command::RemoveItem),
    (Matcher::Prefix, "!li", Command::AddItems),
    (Matcher::Prefix, "!weather", Command::Weather),
    (Matcher::Exact, "!ttsall", Command::TtsAll),
    (Matcher::Prefix, "!ttslang", Command::TtsLang),
    (Matcher::Prefix, "!tts", Command::Tts),
    (Matcher::Prefix, "!setlink", Command::SetLink),
    (Matcher::Prefix, "!run", Command::Run),
    (Matcher::Exact, "!sticker", Command::Sticker),
    (Matcher::Exact, "!toimg", Command::ToImage),
    (Matcher::Prefix, "@everyone", Command::Everyone),
    (Matcher::Suffix, " link", Command::MeetLink),
];

/// Matches a trimmed message body against the trigger table.
///
/// Returns the command and its argument text: the remainder after a
/// prefix, the subject before a suffix, empty for exact matches. The
/// argument is trimmed.
pub fn resolve(body: &str) -> Option<(Command, &str)> {
    for (matcher, trigger, command) in TRIGGERS {
        let args = match matcher {
            Matcher::Exact => (body == *trigger).then_some(""),
            Matcher::Prefix => body.strip_prefix(trigger),
            Matcher::Suffix => body.strip_suffix(trigger),
        };
        if let Some(args) = args {
            return Some((*command, args.trim()));
        }
    }
    None
}

/// Routes one admitted, non-dialog event through the command table.
pub async fn dispatch(
    ctx: &AgentContext,
    event: &InboundEvent,
    body: &str,
) -> Result<(), FamulusError> {
    if let Some((command, args)) = resolve(body) {
        debug!(conversation = %event.conversation_id, trigger = %command, "trigger matched");
        return match command {
            Command::Ping => ping(ctx, event).await,
            Command::Notes => notes::show_all(ctx, event).await,
            Command::Note => notes::create(ctx, event, args).await,
            Command::Del => notes::delete(ctx, event, args).await,
            Command::List => list::show(ctx, event).await,
            Command::DeleteList => list::delete(ctx, event).await,
            Command::RemoveItem => list::remove_item(ctx, event, args).await,
            Command::AddItems => list::add(ctx, event, args).await,
            Command::Weather => weather::report(ctx, event, args).await,
            Command::TtsAll => speech::list_languages(ctx, event).await,
            Command::TtsLang => speech::set_language(ctx, event, args).await,
            Command::Tts => speech::synthesize(ctx, event, args).await,
            Command::SetLink => links::set(ctx, event, args).await,
            Command::Run => exec::run(ctx, event, args).await,
            Command::Sticker => media::to_sticker(ctx, event).await,
            Command::ToImage => media::to_image(ctx, event).await,
            Command::Everyone => mention::everyone(ctx, event, args).await,
            Command::MeetLink => links::lookup(ctx, event, args).await,
        };
    }

    if body.starts_with('!') {
        debug!(conversation = %event.conversation_id, body, "unknown trigger, staying silent");
        return Ok(());
    }

    welcome::greet(ctx, event).await
}

async fn ping(ctx: &AgentContext, event: &InboundEvent) -> Result<(), FamulusError> {
    ctx.channel
        .send(OutboundMessage::reply(
            event.conversation_id.clone(),
            event.id.clone(),
            "pong!",
        ))
        .await?;
    Ok(())
}
