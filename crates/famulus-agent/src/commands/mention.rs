// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group-wide mentions: `@everyone` pings every participant of the
//! conversation, optionally carrying a custom or quoted text.

use famulus_core::types::{InboundEvent, OutboundContent, OutboundMessage, SendOptions};
use famulus_core::FamulusError;
use tracing::debug;

use crate::AgentContext;

pub(crate) async fn everyone(
    ctx: &AgentContext,
    event: &InboundEvent,
    args: &str,
) -> Result<(), FamulusError> {
    let participants = ctx.channel.participants(&event.conversation_id).await?;
    if participants.is_empty() {
        debug!(conversation = %event.conversation_id, "no participants to mention");
        return Ok(());
    }

    let tags: Vec<String> = participants
        .iter()
        .map(|participant| {
            format!("@{}", participant.split('@').next().unwrap_or(participant.as_str()))
        })
        .collect();

    let text = if !args.is_empty() {
        args.to_string()
    } else if let Some(quoted) = &event.quoted {
        quoted.body.clone()
    } else {
        tags.join(" ")
    };

    ctx.channel
        .send(OutboundMessage {
            conversation_id: event.conversation_id.clone(),
            content: OutboundContent::Text(text),
            options: SendOptions {
                mentions: participants,
                ..SendOptions::default()
            },
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::harness;
    use famulus_test_utils::text_event;

    #[tokio::test]
    async fn bare_everyone_tags_each_participant() {
        let fixture = harness();
        fixture
            .transport
            .script_participants(
                "group@g.us",
                vec!["111@c.us".to_string(), "222@c.us".to_string()],
            )
            .await;

        let event = text_event("group@g.us", "user@c.us", "@everyone");
        everyone(&fixture.ctx, &event, "").await.unwrap();

        let sent = fixture.transport.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].content, OutboundContent::Text("@111 @222".to_string()));
        assert_eq!(
            sent[0].options.mentions,
            vec!["111@c.us".to_string(), "222@c.us".to_string()]
        );
    }

    #[tokio::test]
    async fn custom_text_replaces_the_tag_list() {
        let fixture = harness();
        fixture
            .transport
            .script_participants("group@g.us", vec!["111@c.us".to_string()])
            .await;

        let event = text_event("group@g.us", "user@c.us", "@everyone standup in 5");
        everyone(&fixture.ctx, &event, "standup in 5").await.unwrap();

        let sent = fixture.transport.sent_messages().await;
        assert_eq!(sent[0].content, OutboundContent::Text("standup in 5".to_string()));
        assert_eq!(sent[0].options.mentions, vec!["111@c.us".to_string()]);
    }

    #[tokio::test]
    async fn quoted_body_is_forwarded_when_no_text_is_given() {
        let fixture = harness();
        fixture
            .transport
            .script_participants("group@g.us", vec!["111@c.us".to_string()])
            .await;

        let mut event = text_event("group@g.us", "user@c.us", "@everyone");
        event.quoted = Some(Box::new(text_event("group@g.us", "friend@c.us", "meeting moved")));
        everyone(&fixture.ctx, &event, "").await.unwrap();

        let sent = fixture.transport.sent_messages().await;
        assert_eq!(sent[0].content, OutboundContent::Text("meeting moved".to_string()));
    }

    #[tokio::test]
    async fn direct_chats_without_participants_stay_silent() {
        let fixture = harness();
        let event = text_event("user@c.us", "user@c.us", "@everyone");
        everyone(&fixture.ctx, &event, "").await.unwrap();
        assert_eq!(fixture.transport.sent_count().await, 0);
    }
}
