// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event routing and conversation handling for the Famulus agent.
//!
//! The [`AgentRouter`] is the central coordinator that:
//! - Receives transport events from the channel adapter
//! - Routes inbound messages to per-conversation workers
//! - Persists refreshed session credentials as the channel re-authenticates
//! - Handles graceful shutdown
//!
//! Each worker applies the access gate, the e-mail composer dialog, and
//! the command table, in that order.

pub mod bootstrap;
pub mod commands;
pub mod dialog;
pub mod gate;
pub mod qr;
pub mod shutdown;
pub mod state;
mod worker;

#[cfg(test)]
pub(crate) mod testing;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use famulus_config::FamulusConfig;
use famulus_core::traits::{
    ChannelAdapter, ExecService, MailService, SpeechService, StoreAdapter, WeatherService,
};
use famulus_core::types::{ConversationId, InboundEvent, MeetLink, TransportEvent};
use famulus_core::FamulusError;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::dialog::MailDraft;
use crate::state::RuntimeState;
use crate::worker::ConversationWorker;

/// External service adapters the command handlers call out to.
pub struct Services {
    pub weather: Arc<dyn WeatherService + Send + Sync>,
    pub speech: Arc<dyn SpeechService + Send + Sync>,
    pub exec: Arc<dyn ExecService + Send + Sync>,
    pub mail: Arc<dyn MailService + Send + Sync>,
}

/// Everything a conversation worker needs, shared behind one [`Arc`].
///
/// Mutable pieces carry their own synchronization: the runtime switches
/// sit behind an async [`RwLock`], parked mail drafts behind a [`Mutex`],
/// and the meet-link cache is a [`DashMap`] keyed by lowercased subject.
pub struct AgentContext {
    pub channel: Arc<dyn ChannelAdapter + Send + Sync>,
    pub store: Arc<dyn StoreAdapter + Send + Sync>,
    pub services: Services,
    pub state: Arc<RwLock<RuntimeState>>,
    pub links: DashMap<String, MeetLink>,
    pub drafts: Mutex<HashMap<ConversationId, MailDraft>>,
    pub config: FamulusConfig,
    pub started_at: Instant,
}

impl AgentContext {
    pub fn new(
        channel: Arc<dyn ChannelAdapter + Send + Sync>,
        store: Arc<dyn StoreAdapter + Send + Sync>,
        services: Services,
        config: FamulusConfig,
        started_at: Instant,
    ) -> Self {
        let state = RuntimeState::from_config(&config);
        Self {
            channel,
            store,
            services,
            state: Arc::new(RwLock::new(state)),
            links: DashMap::new(),
            drafts: Mutex::new(HashMap::new()),
            config,
            started_at,
        }
    }
}

/// The main event router: consumes transport events and fans inbound
/// messages out to one worker per conversation.
pub struct AgentRouter {
    ctx: Arc<AgentContext>,
    workers: HashMap<ConversationId, ConversationWorker>,
}

impl AgentRouter {
    pub fn new(ctx: Arc<AgentContext>) -> Self {
        info!(
            introvert = ctx.config.agent.introvert,
            whitelisted = ctx.config.agent.whitelist.len(),
            "event router initialized"
        );
        Self {
            ctx,
            workers: HashMap::new(),
        }
    }

    /// Runs the router until the cancellation token fires or the channel
    /// session becomes unrecoverable.
    ///
    /// The loop:
    /// 1. Waits for the next transport event from the channel
    /// 2. Routes messages to their conversation worker, spawning on demand
    /// 3. On cancellation, drains the workers before closing the store
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), FamulusError> {
        info!("event router running");
        let channel = self.ctx.channel.clone();
        let mut fatal: Option<FamulusError> = None;

        loop {
            tokio::select! {
                event = channel.next_event() => {
                    match event {
                        Ok(event) => {
                            if let Err(e) = self.handle_event(event).await {
                                if matches!(e, FamulusError::AuthFailure(_)) {
                                    error!(error = %e, "channel session lost, stopping");
                                    fatal = Some(e);
                                    break;
                                }
                                error!(error = %e, "failed to handle transport event");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "transport receive error");
                            // If the transport is closed, break out of the loop.
                            if e.to_string().contains("closed") {
                                break;
                            }
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping event router");
                    break;
                }
            }
        }

        // Drain queued events, then close storage.
        shutdown::drain_workers(std::mem::take(&mut self.workers), Duration::from_secs(10)).await;
        self.ctx.store.close().await?;

        info!("event router stopped");
        match fatal {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn handle_event(&mut self, event: TransportEvent) -> Result<(), FamulusError> {
        match event {
            TransportEvent::Message(event) => self.dispatch(event).await,
            TransportEvent::Authenticated { credential } => {
                self.ctx.store.save_credential(&credential).await?;
                info!("refreshed session credential persisted");
                Ok(())
            }
            TransportEvent::Qr { code } => {
                let rendered = qr::render_terminal(&code)?;
                println!("{rendered}");
                info!("re-pairing QR printed, scan it with the phone");
                Ok(())
            }
            TransportEvent::AuthFailure { reason } => Err(FamulusError::AuthFailure(reason)),
            TransportEvent::Ready => {
                debug!("channel reports ready");
                Ok(())
            }
        }
    }

    /// Hands the event to its conversation's worker, spawning one on first
    /// contact and respawning if the previous worker task died.
    async fn dispatch(&mut self, event: InboundEvent) -> Result<(), FamulusError> {
        let conversation_id = event.conversation_id.clone();
        if let Some(worker) = self.workers.get(&conversation_id) {
            match worker.submit(event).await {
                Ok(()) => return Ok(()),
                Err(returned) => {
                    warn!(conversation = %conversation_id, "conversation worker gone, respawning");
                    self.workers.remove(&conversation_id);
                    return self.spawn_and_submit(conversation_id, returned).await;
                }
            }
        }
        self.spawn_and_submit(conversation_id, event).await
    }

    async fn spawn_and_submit(
        &mut self,
        conversation_id: ConversationId,
        event: InboundEvent,
    ) -> Result<(), FamulusError> {
        debug!(conversation = %conversation_id, "spawning conversation worker");
        let worker = ConversationWorker::spawn(conversation_id.clone(), self.ctx.clone());
        worker.submit(event).await.map_err(|_| {
            FamulusError::Internal(format!(
                "fresh worker for {conversation_id} rejected its first event"
            ))
        })?;
        self.workers.insert(conversation_id, worker);
        Ok(())
    }
}

/// Formats elapsed time as zero-padded `HH:MM:SS`; hours grow past two
/// digits rather than wrapping.
pub fn format_uptime(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, sent_texts};
    use famulus_test_utils::text_event;

    #[test]
    fn uptime_is_zero_padded() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(3661)), "01:01:01");
        assert_eq!(format_uptime(Duration::from_secs(59)), "00:00:59");
    }

    #[test]
    fn uptime_hours_do_not_wrap_at_a_day() {
        assert_eq!(format_uptime(Duration::from_secs(90_000)), "25:00:00");
    }

    #[tokio::test]
    async fn router_routes_messages_and_drains_on_cancel() {
        let fixture = harness();
        fixture
            .transport
            .inject_message(text_event("chat@c.us", "user@c.us", "!ping"))
            .await;

        let mut router = AgentRouter::new(fixture.ctx.clone());
        let cancel = CancellationToken::new();
        let run_cancel = cancel.clone();
        let handle = tokio::spawn(async move { router.run(run_cancel).await });

        let mut polls = 0;
        while fixture.transport.sent_count().await == 0 && polls < 200 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            polls += 1;
        }
        cancel.cancel();
        handle.await.unwrap().unwrap();

        assert_eq!(sent_texts(&fixture).await, vec!["pong!".to_string()]);
    }

    #[tokio::test]
    async fn auth_failure_stops_the_router_with_an_error() {
        let fixture = harness();
        fixture
            .transport
            .inject_event(TransportEvent::AuthFailure {
                reason: "logged out".to_string(),
            })
            .await;

        let mut router = AgentRouter::new(fixture.ctx.clone());
        let err = router.run(CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, FamulusError::AuthFailure(_)));
    }

    #[tokio::test]
    async fn refreshed_credentials_are_persisted() {
        let fixture = harness();
        fixture
            .transport
            .inject_event(TransportEvent::Authenticated {
                credential: b"rotated-blob".to_vec(),
            })
            .await;

        let mut router = AgentRouter::new(fixture.ctx.clone());
        let cancel = CancellationToken::new();
        let run_cancel = cancel.clone();
        let handle = tokio::spawn(async move { router.run(run_cancel).await });

        let mut polls = 0;
        while fixture.store.call_count("save_credential").await == 0 && polls < 200 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            polls += 1;
        }
        cancel.cancel();
        handle.await.unwrap().unwrap();

        assert_eq!(
            fixture.store.load_credential().await.unwrap(),
            Some(b"rotated-blob".to_vec())
        );
    }

    #[tokio::test]
    async fn one_worker_per_conversation_keeps_order_within_a_chat() {
        let fixture = harness();
        fixture
            .transport
            .inject_message(text_event("a@c.us", "user@c.us", "!note first"))
            .await;
        fixture
            .transport
            .inject_message(text_event("a@c.us", "user@c.us", "!note second"))
            .await;
        fixture
            .transport
            .inject_message(text_event("b@c.us", "other@c.us", "!ping"))
            .await;

        let mut router = AgentRouter::new(fixture.ctx.clone());
        let cancel = CancellationToken::new();
        let run_cancel = cancel.clone();
        let handle = tokio::spawn(async move { router.run(run_cancel).await });

        let mut polls = 0;
        while fixture.transport.sent_count().await < 3 && polls < 200 {
            tokio::time::sleep(Duration::from_millis(5)).await;
            polls += 1;
        }
        cancel.cancel();
        handle.await.unwrap().unwrap();

        let texts = sent_texts(&fixture).await;
        let chat_a: Vec<_> = texts.iter().filter(|t| t.contains('✅')).collect();
        assert_eq!(chat_a, vec!["first ✅", "second ✅"]);
        assert!(texts.iter().any(|t| t == "pong!"));
    }
}
