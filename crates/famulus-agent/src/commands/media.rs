// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media conversion: re-send a quoted attachment as a sticker
//! (`!sticker`) or back as a plain image (`!toimg`).

use famulus_core::types::{InboundEvent, OutboundContent, OutboundMessage, SendOptions};
use famulus_core::FamulusError;
use tracing::warn;

use crate::AgentContext;

pub(crate) async fn to_sticker(
    ctx: &AgentContext,
    event: &InboundEvent,
) -> Result<(), FamulusError> {
    convert(ctx, event, true).await
}

pub(crate) async fn to_image(
    ctx: &AgentContext,
    event: &InboundEvent,
) -> Result<(), FamulusError> {
    convert(ctx, event, false).await
}

/// Downloads the attachment of the quoted message and re-sends it, flipping
/// the sticker flag. The channel performs the actual format conversion.
async fn convert(
    ctx: &AgentContext,
    event: &InboundEvent,
    as_sticker: bool,
) -> Result<(), FamulusError> {
    let Some(media) = event.quoted.as_ref().and_then(|quoted| quoted.attachment.as_ref()) else {
        ctx.channel
            .send(OutboundMessage::text(
                event.conversation_id.clone(),
                "Quote a message with media first. 😒",
            ))
            .await?;
        return Ok(());
    };

    let payload = match ctx.channel.download_media(media).await {
        Ok(payload) => payload,
        Err(e) => {
            warn!(media = %media.id, error = %e, "media download failed");
            ctx.channel
                .send(OutboundMessage::text(
                    event.conversation_id.clone(),
                    "Could not fetch the media. ❌",
                ))
                .await?;
            return Ok(());
        }
    };

    ctx.channel
        .send(OutboundMessage {
            conversation_id: event.conversation_id.clone(),
            content: OutboundContent::Media(payload),
            options: SendOptions {
                quoted: Some(event.id.clone()),
                as_sticker,
                ..SendOptions::default()
            },
        })
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, sent_texts};
    use famulus_core::types::{MediaPayload, MediaRef};
    use famulus_test_utils::text_event;

    fn quoted_media_event() -> InboundEvent {
        let mut quoted = text_event("chat@c.us", "friend@c.us", "");
        quoted.attachment = Some(MediaRef {
            id: "media-1".to_string(),
            mimetype: Some("image/jpeg".to_string()),
        });
        let mut event = text_event("chat@c.us", "user@c.us", "!sticker");
        event.quoted = Some(Box::new(quoted));
        event
    }

    #[tokio::test]
    async fn sticker_resends_the_quoted_media_with_the_flag_set() {
        let fixture = harness();
        fixture
            .transport
            .script_media(
                "media-1",
                MediaPayload {
                    bytes: b"jpeg-bytes".to_vec(),
                    mimetype: "image/jpeg".to_string(),
                    filename: None,
                },
            )
            .await;

        to_sticker(&fixture.ctx, &quoted_media_event()).await.unwrap();

        let sent = fixture.transport.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].options.as_sticker);
        assert!(sent[0].options.quoted.is_some());
        match &sent[0].content {
            OutboundContent::Media(payload) => assert_eq!(payload.bytes, b"jpeg-bytes"),
            other => panic!("expected media, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn toimg_clears_the_sticker_flag() {
        let fixture = harness();
        fixture
            .transport
            .script_media(
                "media-1",
                MediaPayload {
                    bytes: b"webp-bytes".to_vec(),
                    mimetype: "image/webp".to_string(),
                    filename: None,
                },
            )
            .await;

        to_image(&fixture.ctx, &quoted_media_event()).await.unwrap();

        let sent = fixture.transport.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert!(!sent[0].options.as_sticker);
    }

    #[tokio::test]
    async fn missing_quote_asks_for_one() {
        let fixture = harness();
        let event = text_event("chat@c.us", "user@c.us", "!sticker");
        to_sticker(&fixture.ctx, &event).await.unwrap();
        assert_eq!(
            sent_texts(&fixture).await,
            vec!["Quote a message with media first. 😒".to_string()]
        );
    }

    #[tokio::test]
    async fn quoted_text_without_attachment_asks_for_media() {
        let fixture = harness();
        let mut event = text_event("chat@c.us", "user@c.us", "!sticker");
        event.quoted = Some(Box::new(text_event("chat@c.us", "friend@c.us", "hi")));
        to_sticker(&fixture.ctx, &event).await.unwrap();
        assert_eq!(
            sent_texts(&fixture).await,
            vec!["Quote a message with media first. 😒".to_string()]
        );
    }

    #[tokio::test]
    async fn failed_download_reports_instead_of_erroring() {
        let fixture = harness();
        // No scripted media: the mock transport fails the download.
        to_sticker(&fixture.ctx, &quoted_media_event()).await.unwrap();
        assert_eq!(
            sent_texts(&fixture).await,
            vec!["Could not fetch the media. ❌".to_string()]
        );
    }
}
