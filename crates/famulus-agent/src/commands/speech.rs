// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text-to-speech: `!tts`, `!ttslang <code>`, `!ttsall`.

use famulus_core::types::{
    InboundEvent, MediaPayload, OutboundContent, OutboundMessage, SendOptions,
};
use famulus_core::FamulusError;
use tracing::warn;

use crate::AgentContext;

/// Synthesizes the argument text (or the quoted message, for a bare
/// `!tts`) and sends it back as a voice note. Adapter failures are logged
/// and produce no reply.
pub(crate) async fn synthesize(
    ctx: &AgentContext,
    event: &InboundEvent,
    args: &str,
) -> Result<(), FamulusError> {
    let text = if !args.is_empty() {
        args.to_string()
    } else {
        event
            .quoted
            .as_ref()
            .map(|quoted| quoted.body.trim().to_string())
            .unwrap_or_default()
    };
    if text.is_empty() {
        ctx.channel
            .send(OutboundMessage::text(
                event.conversation_id.clone(),
                "!tts <text> (or quote a message)",
            ))
            .await?;
        return Ok(());
    }

    let language = ctx.state.read().await.tts_lang.clone();
    match ctx.services.speech.synthesize(&text, &language).await {
        Ok(bytes) => {
            let voice = OutboundMessage {
                conversation_id: event.conversation_id.clone(),
                content: OutboundContent::Media(MediaPayload {
                    bytes,
                    mimetype: "audio/mpeg".to_string(),
                    filename: None,
                }),
                options: SendOptions {
                    quoted: Some(event.id.clone()),
                    as_voice: true,
                    ..SendOptions::default()
                },
            };
            ctx.channel.send(voice).await?;
        }
        Err(e) => {
            warn!(language, error = %e, "speech synthesis failed");
        }
    }
    Ok(())
}

/// Switches the default TTS language when the code is recognized.
pub(crate) async fn set_language(
    ctx: &AgentContext,
    event: &InboundEvent,
    args: &str,
) -> Result<(), FamulusError> {
    let code = args.to_lowercase();
    let known = ctx
        .services
        .speech
        .languages()
        .iter()
        .any(|language| language.code == code);

    let reply = if known {
        ctx.state.write().await.tts_lang = code.clone();
        format!("TTS language set to {code}.")
    } else {
        "Unsupported language code. See !ttsall.".to_string()
    };
    ctx.channel
        .send(OutboundMessage::text(event.conversation_id.clone(), reply))
        .await?;
    Ok(())
}

/// Enumerates the supported language codes.
pub(crate) async fn list_languages(
    ctx: &AgentContext,
    event: &InboundEvent,
) -> Result<(), FamulusError> {
    let lines: Vec<String> = ctx
        .services
        .speech
        .languages()
        .iter()
        .map(|language| format!("{} - {}", language.code, language.name))
        .collect();
    ctx.channel
        .send(OutboundMessage::text(
            event.conversation_id.clone(),
            format!("*Supported TTS languages*\n{}", lines.join("\n")),
        ))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{degraded_harness, harness, sent_texts};
    use famulus_test_utils::text_event;

    #[tokio::test]
    async fn tts_sends_a_quoted_voice_note() {
        let fixture = harness();
        let event = text_event("chat@c.us", "user@c.us", "!tts hello there");
        synthesize(&fixture.ctx, &event, "hello there").await.unwrap();

        let sent = fixture.transport.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert!(sent[0].options.as_voice);
        assert_eq!(sent[0].options.quoted, Some(event.id));
        match &sent[0].content {
            OutboundContent::Media(payload) => {
                assert_eq!(payload.mimetype, "audio/mpeg");
                assert!(!payload.bytes.is_empty());
            }
            _ => panic!("expected media"),
        }
        assert_eq!(fixture.speech.calls(), 1);
    }

    #[tokio::test]
    async fn bare_tts_reads_the_quoted_message() {
        let fixture = harness();
        let mut event = text_event("chat@c.us", "user@c.us", "!tts");
        event.quoted = Some(Box::new(text_event("chat@c.us", "friend@c.us", "read me")));
        synthesize(&fixture.ctx, &event, "").await.unwrap();

        assert_eq!(fixture.speech.calls(), 1);
        assert_eq!(fixture.transport.sent_count().await, 1);
    }

    #[tokio::test]
    async fn bare_tts_without_a_quote_shows_usage() {
        let fixture = harness();
        let event = text_event("chat@c.us", "user@c.us", "!tts");
        synthesize(&fixture.ctx, &event, "").await.unwrap();

        assert_eq!(
            sent_texts(&fixture).await,
            vec!["!tts <text> (or quote a message)".to_string()]
        );
        assert_eq!(fixture.speech.calls(), 0);
    }

    #[tokio::test]
    async fn synthesis_failure_stays_silent() {
        let fixture = degraded_harness();
        let event = text_event("chat@c.us", "user@c.us", "!tts hello");
        synthesize(&fixture.ctx, &event, "hello").await.unwrap();
        assert_eq!(fixture.transport.sent_count().await, 0);
    }

    #[tokio::test]
    async fn language_switch_requires_a_known_code() {
        let fixture = harness();
        let event = text_event("chat@c.us", "user@c.us", "!ttslang HI-IN");

        set_language(&fixture.ctx, &event, "HI-IN").await.unwrap();
        assert_eq!(fixture.ctx.state.read().await.tts_lang, "hi-in");

        set_language(&fixture.ctx, &event, "xx-yy").await.unwrap();
        assert_eq!(fixture.ctx.state.read().await.tts_lang, "hi-in");

        assert_eq!(
            sent_texts(&fixture).await,
            vec![
                "TTS language set to hi-in.".to_string(),
                "Unsupported language code. See !ttsall.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn ttsall_enumerates_the_codes() {
        let fixture = harness();
        let event = text_event("chat@c.us", "user@c.us", "!ttsall");
        list_languages(&fixture.ctx, &event).await.unwrap();

        let sent = sent_texts(&fixture).await;
        assert!(sent[0].starts_with("*Supported TTS languages*"));
        assert!(sent[0].contains("en-us - English (United States)"));
        assert!(sent[0].contains("hi-in - Hindi"));
    }
}
