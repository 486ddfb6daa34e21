// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The weather-enriched greeting for plain (non-command) messages.

use famulus_core::types::{InboundEvent, OutboundMessage};
use famulus_core::FamulusError;

use crate::commands::weather;
use crate::AgentContext;

/// Greets a conversation that sent ordinary text: current weather for the
/// default city, uptime, and the command summary.
pub(crate) async fn greet(ctx: &AgentContext, event: &InboundEvent) -> Result<(), FamulusError> {
    let city = &ctx.config.weather.default_city;
    let weather = weather::lookup_text(ctx, city).await;
    let uptime = crate::format_uptime(ctx.started_at.elapsed());

    let text = format!(
        "*Welcome*\n\
         {weather}\n\
         *Stats*\n\
         Uptime: {uptime}\n\
         Stop talking with the bot with !pause\n\
         \n\
         *Available commands*\n\
         *Notes*\n\
         !note <text> (Add New Note)\n\
         !notes (View all Notes)\n\
         !del <note> (Delete Notes)\n\
         !weather <city || default={city}>\n\
         \n\
         *E-mail*\n\
         !email !discard !draft\n\
         \n\
         *List*\n\
         !list\n\
         !li <Add Items separated by space>\n\
         !dlist (Deletes the entire list)\n\
         !dl <index> (Deletes # item from list)\n\
         *Other*\n\
         !ping\n\
         !pause"
    );

    ctx.channel
        .send(OutboundMessage::text(event.conversation_id.clone(), text))
        .await?;
    Ok(())
}
