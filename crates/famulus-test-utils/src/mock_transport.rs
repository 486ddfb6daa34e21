// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockTransport` implements `ChannelAdapter` with injectable transport
//! events and captured outbound traffic for assertion in tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use famulus_core::types::{
    AdapterType, ChannelCapabilities, ConversationId, HealthStatus, InboundEvent, MediaPayload,
    MediaRef, MessageId, OutboundMessage, TransportEvent,
};
use famulus_core::{ChannelAdapter, FamulusError, PluginAdapter};

/// Builds a plain text [`InboundEvent`] the way the bridge would deliver it.
pub fn text_event(conversation: &str, sender: &str, body: &str) -> InboundEvent {
    InboundEvent {
        id: MessageId(format!("test-{}", uuid::Uuid::new_v4())),
        sender_id: sender.to_string(),
        conversation_id: ConversationId(conversation.to_string()),
        body: body.to_string(),
        attachment: None,
        quoted: None,
        is_broadcast_status: false,
        timestamp: chrono::Utc::now(),
    }
}

/// A mock messaging transport for testing.
///
/// Provides injectable queues in both directions:
/// - **events**: injected via [`inject_event`](Self::inject_event) /
///   [`inject_message`](Self::inject_message), returned by `next_event()`
/// - **sent**: everything passed to `send()`, retrievable via
///   [`sent_messages`](Self::sent_messages)
/// - **statuses**: every `set_status()` text in call order
///
/// Media downloads and participant listings answer from scripted maps.
pub struct MockTransport {
    events: Arc<Mutex<VecDeque<TransportEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    statuses: Arc<Mutex<Vec<String>>>,
    participants: Arc<Mutex<HashMap<String, Vec<String>>>>,
    media: Arc<Mutex<HashMap<String, MediaPayload>>>,
    notify: Arc<Notify>,
}

impl MockTransport {
    /// Creates a new mock transport with empty queues.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            statuses: Arc::new(Mutex::new(Vec::new())),
            participants: Arc::new(Mutex::new(HashMap::new())),
            media: Arc::new(Mutex::new(HashMap::new())),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Injects a raw transport event; the next `next_event()` call returns it.
    pub async fn inject_event(&self, event: TransportEvent) {
        self.events.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Injects an inbound chat message.
    pub async fn inject_message(&self, event: InboundEvent) {
        self.inject_event(TransportEvent::Message(event)).await;
    }

    /// Everything sent through `send()`, in call order.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Number of messages sent so far.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Drops all captured outbound messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }

    /// Every `set_status()` text, in call order.
    pub async fn statuses(&self) -> Vec<String> {
        self.statuses.lock().await.clone()
    }

    /// Scripts the participant listing for a conversation.
    pub async fn script_participants(&self, conversation: &str, ids: Vec<String>) {
        self.participants
            .lock()
            .await
            .insert(conversation.to_string(), ids);
    }

    /// Scripts the payload returned when `media_id` is downloaded.
    pub async fn script_media(&self, media_id: &str, payload: MediaPayload) {
        self.media.lock().await.insert(media_id.to_string(), payload);
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockTransport {
    fn name(&self) -> &str {
        "mock-transport"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FamulusError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockTransport {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            media: true,
            mentions: true,
            status: true,
        }
    }

    async fn connect(&mut self, _resume: Option<Vec<u8>>) -> Result<(), FamulusError> {
        Ok(())
    }

    async fn next_event(&self) -> Result<TransportEvent, FamulusError> {
        loop {
            {
                let mut queue = self.events.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            // Wait until something is injected.
            self.notify.notified().await;
        }
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, FamulusError> {
        let id = format!("mock-msg-{}", uuid::Uuid::new_v4());
        self.sent.lock().await.push(msg);
        Ok(MessageId(id))
    }

    async fn set_status(&self, text: &str) -> Result<(), FamulusError> {
        self.statuses.lock().await.push(text.to_string());
        Ok(())
    }

    async fn download_media(&self, media: &MediaRef) -> Result<MediaPayload, FamulusError> {
        self.media
            .lock()
            .await
            .get(&media.id)
            .cloned()
            .ok_or_else(|| {
                FamulusError::channel(format!("no scripted media for id {}", media.id))
            })
    }

    async fn participants(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<String>, FamulusError> {
        Ok(self
            .participants
            .lock()
            .await
            .get(&conversation_id.0)
            .cloned()
            .unwrap_or_default())
    }
}
