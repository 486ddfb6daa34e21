// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote code execution: `!run <language>` with the code on the
//! following lines or in a quoted message.

use famulus_core::types::{InboundEvent, OutboundMessage};
use famulus_core::FamulusError;
use tracing::warn;

use crate::AgentContext;

/// Validates the language against the adapter's allow-list, forwards the
/// source, and replies with whatever output the runner captured.
pub(crate) async fn run(
    ctx: &AgentContext,
    event: &InboundEvent,
    args: &str,
) -> Result<(), FamulusError> {
    let (language, source) = match args.split_once('\n') {
        Some((language, source)) => (language.trim().to_string(), source.to_string()),
        None => (
            args.to_string(),
            event
                .quoted
                .as_ref()
                .map(|quoted| quoted.body.clone())
                .unwrap_or_default(),
        ),
    };

    if language.is_empty() || source.trim().is_empty() {
        ctx.channel
            .send(OutboundMessage::text(
                event.conversation_id.clone(),
                "*Syntax Error!*\nUsage: !run <language> with the code on the next line, or quote a message holding the code.",
            ))
            .await?;
        return Ok(());
    }

    // The allow-list gate runs before any execution request is made.
    let language = language.to_lowercase();
    let runtimes = ctx.services.exec.runtimes();
    if !runtimes.iter().any(|runtime| runtime.language == language) {
        let known: Vec<&str> = runtimes.iter().map(|r| r.language.as_str()).collect();
        ctx.channel
            .send(OutboundMessage::text(
                event.conversation_id.clone(),
                format!("Unsupported language. Try one of: {}", known.join(", ")),
            ))
            .await?;
        return Ok(());
    }

    let reply = match ctx.services.exec.run(&language, &source).await {
        Ok(outcome) => {
            if outcome.output.trim().is_empty() {
                "*(no output)*".to_string()
            } else {
                outcome.output
            }
        }
        Err(e) => {
            warn!(language, error = %e, "remote execution failed");
            "Execution failed.".to_string()
        }
    };
    ctx.channel
        .send(OutboundMessage::reply(
            event.conversation_id.clone(),
            event.id.clone(),
            reply,
        ))
        .await?;
    Ok(())
}
