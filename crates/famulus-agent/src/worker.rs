// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation workers.
//!
//! Every conversation gets its own task with a bounded mailbox, so a slow
//! adapter call in one chat never stalls the others while messages within
//! a chat still apply strictly in arrival order. The worker owns the
//! conversation's composer dialog; drafts parked with `!draft` live in the
//! shared context so they survive worker restarts.

use std::sync::Arc;

use famulus_core::types::{ConversationId, InboundEvent, OutboundMessage};
use famulus_core::FamulusError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::commands;
use crate::dialog::{Dialog, Step};
use crate::gate::{self, Admission};
use crate::AgentContext;

const MAILBOX_DEPTH: usize = 32;

pub(crate) struct ConversationWorker {
    tx: mpsc::Sender<InboundEvent>,
    handle: JoinHandle<()>,
}

impl ConversationWorker {
    pub(crate) fn spawn(conversation_id: ConversationId, ctx: Arc<AgentContext>) -> Self {
        let (tx, mut rx) = mpsc::channel(MAILBOX_DEPTH);
        let handle = tokio::spawn(async move {
            let mut dialog: Option<Dialog> = None;
            while let Some(event) = rx.recv().await {
                if let Err(e) = handle_event(&ctx, &mut dialog, event).await {
                    error!(conversation = %conversation_id, error = %e, "event handling failed");
                }
            }
            debug!(conversation = %conversation_id, "conversation worker stopped");
        });
        Self { tx, handle }
    }

    /// Queues an event, applying backpressure when the mailbox is full.
    /// Returns the event when the worker task has already exited.
    pub(crate) async fn submit(&self, event: InboundEvent) -> Result<(), InboundEvent> {
        self.tx.send(event).await.map_err(|err| err.0)
    }

    /// Closes the mailbox and hands out the task handle; the worker exits
    /// once its queued events are processed.
    pub(crate) fn into_handle(self) -> JoinHandle<()> {
        self.handle
    }
}

/// Processes one event for one conversation: access gate first, then the
/// composer dialog if one is active or being opened, then the command table.
pub(crate) async fn handle_event(
    ctx: &AgentContext,
    dialog: &mut Option<Dialog>,
    event: InboundEvent,
) -> Result<(), FamulusError> {
    let admission = {
        let mut state = ctx.state.write().await;
        gate::admit(&mut state, &event, ctx.config.agent.owner.as_deref())
    };
    match admission {
        Admission::Drop => {
            debug!(conversation = %event.conversation_id, "event dropped by the access gate");
            return Ok(());
        }
        Admission::Reply(text) => {
            ctx.channel
                .send(OutboundMessage::text(event.conversation_id.clone(), text))
                .await?;
            return Ok(());
        }
        Admission::Process => {}
    }

    let body = event.body.trim().to_string();
    if dialog.is_some() || matches!(body.as_str(), "!email" | "!discard" | "!draft") {
        dialog_turn(ctx, dialog, &event, &body).await
    } else {
        commands::dispatch(ctx, &event, &body).await
    }
}

async fn dialog_turn(
    ctx: &AgentContext,
    slot: &mut Option<Dialog>,
    event: &InboundEvent,
    body: &str,
) -> Result<(), FamulusError> {
    match body {
        "!email" => {
            let (dialog, banner) = Dialog::begin();
            *slot = Some(dialog);
            reply(ctx, event, banner).await
        }
        "!discard" => {
            *slot = None;
            ctx.drafts.lock().await.remove(&event.conversation_id);
            reply(ctx, event, "Discarded. 🗑️").await
        }
        "!draft" => {
            if let Some(active) = slot.take() {
                ctx.drafts
                    .lock()
                    .await
                    .insert(event.conversation_id.clone(), active.into_draft());
                return reply(ctx, event, "Draft Saved. 💾").await;
            }
            let preview = ctx
                .drafts
                .lock()
                .await
                .get(&event.conversation_id)
                .map(|draft| draft.preview(false));
            match preview {
                Some(text) => reply(ctx, event, text).await,
                None => reply(ctx, event, "No saved draft.").await,
            }
        }
        _ => {
            let Some(active) = slot.take() else {
                return commands::dispatch(ctx, event, body).await;
            };
            match active.advance(body) {
                Step::Prompt(next, prompt) => {
                    *slot = Some(next);
                    reply(ctx, event, prompt).await
                }
                Step::Send(mail) => {
                    // The draft is consumed whether or not delivery works;
                    // a failed send is reported, not retried.
                    ctx.drafts.lock().await.remove(&event.conversation_id);
                    match ctx.services.mail.send(&mail).await {
                        Ok(()) => reply(ctx, event, "Your e-mail was sent. ✅").await,
                        Err(e) => {
                            warn!(conversation = %event.conversation_id, error = %e, "mail delivery failed");
                            reply(ctx, event, "E-mail could not be sent. ❌").await
                        }
                    }
                }
                Step::SaveDraft(draft, text) => {
                    ctx.drafts
                        .lock()
                        .await
                        .insert(event.conversation_id.clone(), draft);
                    reply(ctx, event, text).await
                }
            }
        }
    }
}

async fn reply(
    ctx: &AgentContext,
    event: &InboundEvent,
    text: impl Into<String>,
) -> Result<(), FamulusError> {
    ctx.channel
        .send(OutboundMessage::text(event.conversation_id.clone(), text))
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{degraded_harness, harness, harness_with, sent_texts, Harness};
    use famulus_test_utils::text_event;
    use std::time::Duration;

    async fn drive(fixture: &Harness, dialog: &mut Option<Dialog>, body: &str) {
        let event = text_event("chat@c.us", "user@c.us", body);
        handle_event(&fixture.ctx, dialog, event).await.unwrap();
    }

    #[tokio::test]
    async fn admitted_commands_reach_the_command_table() {
        let fixture = harness();
        let mut dialog = None;
        drive(&fixture, &mut dialog, "!ping").await;
        assert_eq!(sent_texts(&fixture).await, vec!["pong!".to_string()]);
    }

    #[tokio::test]
    async fn introvert_mode_drops_strangers_silently() {
        let mut config = crate::testing::config();
        config.agent.introvert = true;
        let fixture = harness_with(config);

        let mut dialog = None;
        drive(&fixture, &mut dialog, "!ping").await;
        assert_eq!(fixture.transport.sent_count().await, 0);
    }

    #[tokio::test]
    async fn owner_whitelisting_opens_a_conversation() {
        let mut config = crate::testing::config();
        config.agent.introvert = true;
        let fixture = harness_with(config);
        let mut dialog = None;

        // The owner whitelists the chat, after which anyone in it is heard.
        let event = text_event("chat@c.us", "owner@c.us", "!whitelist");
        handle_event(&fixture.ctx, &mut dialog, event).await.unwrap();
        drive(&fixture, &mut dialog, "!ping").await;

        assert_eq!(
            sent_texts(&fixture).await,
            vec!["Whitelisted. ✅".to_string(), "pong!".to_string()]
        );
    }

    #[tokio::test]
    async fn pause_and_start_toggle_processing() {
        let fixture = harness();
        let mut dialog = None;

        drive(&fixture, &mut dialog, "!pause").await;
        drive(&fixture, &mut dialog, "!ping").await;
        drive(&fixture, &mut dialog, "!start").await;
        drive(&fixture, &mut dialog, "!ping").await;

        assert_eq!(
            sent_texts(&fixture).await,
            vec!["OKAY :(".to_string(), "Active!".to_string(), "pong!".to_string()]
        );
    }

    #[tokio::test]
    async fn pause_wins_over_an_open_dialog() {
        let fixture = harness();
        let mut dialog = None;

        drive(&fixture, &mut dialog, "!email").await;
        drive(&fixture, &mut dialog, "!pause").await;

        // The dialog is still open but the gate answered first.
        assert!(dialog.is_some());
        let sent = sent_texts(&fixture).await;
        assert_eq!(sent[1], "OKAY :(");
    }

    #[tokio::test]
    async fn full_email_flow_delivers_one_message() {
        let fixture = harness();
        let mut dialog = None;

        drive(&fixture, &mut dialog, "!email").await;
        drive(&fixture, &mut dialog, "Status report").await;
        drive(&fixture, &mut dialog, "All systems nominal.").await;
        drive(&fixture, &mut dialog, "boss@example.com").await;
        drive(&fixture, &mut dialog, "me@example.com").await;
        drive(&fixture, &mut dialog, "Suman").await;
        drive(&fixture, &mut dialog, "yes").await;

        let sent = fixture.mail.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Status report");
        assert_eq!(sent[0].body, "All systems nominal.");
        assert_eq!(sent[0].to, "boss@example.com");
        assert_eq!(sent[0].reply_to, "me@example.com");
        assert_eq!(sent[0].from_name, "Suman");

        let texts = sent_texts(&fixture).await;
        assert_eq!(texts.last().map(String::as_str), Some("Your e-mail was sent. ✅"));
        assert!(dialog.is_none());
    }

    #[tokio::test]
    async fn declining_the_confirm_parks_a_draft() {
        let fixture = harness();
        let mut dialog = None;

        drive(&fixture, &mut dialog, "!email").await;
        drive(&fixture, &mut dialog, "Subject").await;
        drive(&fixture, &mut dialog, "Body").await;
        drive(&fixture, &mut dialog, "a@b.co").await;
        drive(&fixture, &mut dialog, "c@d.co").await;
        drive(&fixture, &mut dialog, "Name").await;
        drive(&fixture, &mut dialog, "nah").await;

        assert!(dialog.is_none());
        assert_eq!(fixture.mail.sent_count().await, 0);

        // `!draft` with no open dialog previews the parked draft.
        drive(&fixture, &mut dialog, "!draft").await;
        let texts = sent_texts(&fixture).await;
        let preview = texts.last().unwrap();
        assert!(preview.contains("To: a@b.co"));
        assert!(preview.contains("Subject: Subject"));
        assert!(!preview.contains("Confirm Send?"));
    }

    #[tokio::test]
    async fn draft_mid_dialog_parks_the_partial_draft() {
        let fixture = harness();
        let mut dialog = None;

        drive(&fixture, &mut dialog, "!email").await;
        drive(&fixture, &mut dialog, "Half-done subject").await;
        drive(&fixture, &mut dialog, "!draft").await;

        assert!(dialog.is_none());
        let texts = sent_texts(&fixture).await;
        assert_eq!(texts.last().map(String::as_str), Some("Draft Saved. 💾"));
        assert!(fixture
            .ctx
            .drafts
            .lock()
            .await
            .contains_key(&ConversationId::from("chat@c.us")));
    }

    #[tokio::test]
    async fn discard_clears_dialog_and_draft() {
        let fixture = harness();
        let mut dialog = None;

        drive(&fixture, &mut dialog, "!email").await;
        drive(&fixture, &mut dialog, "Subject").await;
        drive(&fixture, &mut dialog, "!discard").await;

        assert!(dialog.is_none());
        drive(&fixture, &mut dialog, "!draft").await;
        let texts = sent_texts(&fixture).await;
        assert_eq!(texts.last().map(String::as_str), Some("No saved draft."));
    }

    #[tokio::test]
    async fn commands_typed_into_a_dialog_are_treated_as_input() {
        let fixture = harness();
        let mut dialog = None;

        drive(&fixture, &mut dialog, "!email").await;
        drive(&fixture, &mut dialog, "!ping").await;

        // "!ping" became the subject; the dialog moved on to the body prompt.
        let texts = sent_texts(&fixture).await;
        assert_eq!(texts.last().map(String::as_str), Some("Alright, What's the message?"));
        assert_eq!(fixture.transport.sent_count().await, 2);
    }

    #[tokio::test]
    async fn failed_delivery_reports_and_drops_the_draft() {
        let fixture = degraded_harness();
        let mut dialog = None;

        drive(&fixture, &mut dialog, "!email").await;
        drive(&fixture, &mut dialog, "S").await;
        drive(&fixture, &mut dialog, "B").await;
        drive(&fixture, &mut dialog, "a@b.co").await;
        drive(&fixture, &mut dialog, "c@d.co").await;
        drive(&fixture, &mut dialog, "N").await;
        drive(&fixture, &mut dialog, "yes").await;

        let texts = sent_texts(&fixture).await;
        assert_eq!(texts.last().map(String::as_str), Some("E-mail could not be sent. ❌"));
        assert!(fixture.ctx.drafts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn spawned_worker_processes_submitted_events_in_order() {
        let fixture = harness();
        let worker = ConversationWorker::spawn(
            ConversationId::from("chat@c.us"),
            fixture.ctx.clone(),
        );

        worker
            .submit(text_event("chat@c.us", "user@c.us", "!note alpha"))
            .await
            .unwrap();
        worker
            .submit(text_event("chat@c.us", "user@c.us", "!notes"))
            .await
            .unwrap();

        // Closing the mailbox lets the worker drain and stop.
        tokio::time::timeout(Duration::from_secs(5), worker.into_handle())
            .await
            .unwrap()
            .unwrap();

        let texts = sent_texts(&fixture).await;
        assert_eq!(texts, vec!["alpha ✅".to_string(), "1. alpha".to_string()]);
    }

    #[tokio::test]
    async fn submit_returns_the_event_once_the_worker_is_gone() {
        let fixture = harness();
        let worker = ConversationWorker::spawn(
            ConversationId::from("chat@c.us"),
            fixture.ctx.clone(),
        );

        let handle = worker.handle;
        handle.abort();
        let _ = handle.await;

        let returned = worker.tx.send(text_event("chat@c.us", "user@c.us", "!ping")).await;
        assert!(returned.is_err());
    }
}
