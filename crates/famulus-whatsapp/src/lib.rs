// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp channel adapter for the Famulus chat agent.
//!
//! Implements [`ChannelAdapter`] as a WebSocket client of a bridge
//! process that owns the vendor protocol. Lifecycle frames (`qr`,
//! `authenticated`, `ready`, ...) and inbound messages arrive on one
//! stream; request/response operations (send, status, media download,
//! participants) are correlated by request id.

pub mod protocol;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use famulus_config::model::WhatsAppConfig;
use famulus_core::types::{
    AdapterType, ChannelCapabilities, ConversationId, HealthStatus, MediaPayload, MediaRef,
    MessageId, OutboundContent, OutboundMessage, TransportEvent,
};
use famulus_core::{ChannelAdapter, FamulusError, PluginAdapter};

use crate::protocol::{BridgeFrame, ClientFrame, MediaFrame, ResponseFrame};

/// WhatsApp bridge client implementing [`ChannelAdapter`].
///
/// [`connect`] spawns a reader task (bridge frames -> transport events /
/// pending-request completion) and a writer task (client frames -> socket).
/// Both stop when the socket closes, which surfaces to the router as an
/// error from [`next_event`].
///
/// [`connect`]: ChannelAdapter::connect
/// [`next_event`]: ChannelAdapter::next_event
pub struct WhatsAppChannel {
    config: WhatsAppConfig,
    event_tx: mpsc::Sender<TransportEvent>,
    event_rx: tokio::sync::Mutex<mpsc::Receiver<TransportEvent>>,
    writer_tx: Option<mpsc::Sender<ClientFrame>>,
    pending: Arc<DashMap<String, oneshot::Sender<ResponseFrame>>>,
    reader_handle: Option<JoinHandle<()>>,
    writer_handle: Option<JoinHandle<()>>,
}

impl WhatsAppChannel {
    /// Creates a new bridge client. No connection is made until
    /// [`ChannelAdapter::connect`].
    pub fn new(config: WhatsAppConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(100);
        Self {
            config,
            event_tx,
            event_rx: tokio::sync::Mutex::new(event_rx),
            writer_tx: None,
            pending: Arc::new(DashMap::new()),
            reader_handle: None,
            writer_handle: None,
        }
    }

    /// Sends one request frame and waits for its correlated response,
    /// bounded by the configured round-trip timeout.
    async fn request(&self, frame: ClientFrame, id: String) -> Result<ResponseFrame, FamulusError> {
        let writer = self
            .writer_tx
            .as_ref()
            .ok_or_else(|| FamulusError::channel("bridge not connected -- call connect() first"))?;

        let (reply_tx, reply_rx) = oneshot::channel();
        self.pending.insert(id.clone(), reply_tx);

        if writer.send(frame).await.is_err() {
            self.pending.remove(&id);
            return Err(FamulusError::channel("bridge connection closed"));
        }

        let timeout = Duration::from_secs(self.config.request_timeout_secs);
        let response = match tokio::time::timeout(timeout, reply_rx).await {
            Ok(Ok(response)) => response,
            Ok(Err(_)) => {
                self.pending.remove(&id);
                return Err(FamulusError::channel("bridge dropped the request"));
            }
            Err(_) => {
                self.pending.remove(&id);
                return Err(FamulusError::channel(format!(
                    "bridge request timed out after {}s",
                    self.config.request_timeout_secs
                )));
            }
        };

        if response.ok {
            Ok(response)
        } else {
            Err(FamulusError::channel(response.error.unwrap_or_else(|| {
                "bridge reported an unspecified error".to_string()
            })))
        }
    }
}

#[async_trait]
impl PluginAdapter for WhatsAppChannel {
    fn name(&self) -> &str {
        "whatsapp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
        match &self.writer_tx {
            Some(tx) if !tx.is_closed() => Ok(HealthStatus::Healthy),
            Some(_) => Ok(HealthStatus::Unhealthy("bridge connection lost".into())),
            None => Ok(HealthStatus::Unhealthy("bridge not connected".into())),
        }
    }

    async fn shutdown(&self) -> Result<(), FamulusError> {
        if let Some(handle) = &self.reader_handle {
            handle.abort();
        }
        if let Some(handle) = &self.writer_handle {
            handle.abort();
        }
        debug!("whatsapp channel shut down");
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for WhatsAppChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            media: true,
            mentions: true,
            status: true,
        }
    }

    async fn connect(&mut self, resume: Option<Vec<u8>>) -> Result<(), FamulusError> {
        if self.writer_tx.is_some() {
            return Ok(()); // Already connected
        }

        let credential = match resume {
            Some(bytes) => Some(String::from_utf8(bytes).map_err(|e| FamulusError::Channel {
                message: format!("persisted credential is not valid UTF-8: {e}"),
                source: Some(Box::new(e)),
            })?),
            None => None,
        };

        info!(url = %self.config.bridge_url, "connecting to WhatsApp bridge");
        let (socket, _) = connect_async(self.config.bridge_url.as_str())
            .await
            .map_err(|e| FamulusError::Channel {
                message: format!("bridge connection failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        let (mut sink, mut stream) = socket.split();

        // Writer task: client frames -> socket.
        let (writer_tx, mut writer_rx) = mpsc::channel::<ClientFrame>(64);
        let writer_handle = tokio::spawn(async move {
            while let Some(frame) = writer_rx.recv().await {
                let text = match serde_json::to_string(&frame) {
                    Ok(t) => t,
                    Err(e) => {
                        error!(error = %e, "failed to encode bridge frame");
                        continue;
                    }
                };
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        });

        // Reader task: bridge frames -> transport events / pending requests.
        let event_tx = self.event_tx.clone();
        let pending = Arc::clone(&self.pending);
        let reader_handle = tokio::spawn(async move {
            while let Some(Ok(msg)) = stream.next().await {
                match msg {
                    Message::Text(text) => {
                        let frame: BridgeFrame = match serde_json::from_str(&text) {
                            Ok(f) => f,
                            Err(e) => {
                                warn!(error = %e, "invalid bridge frame");
                                continue;
                            }
                        };
                        let event = match frame {
                            BridgeFrame::Response(response) => {
                                match pending.remove(&response.id) {
                                    Some((_, reply)) => {
                                        let _ = reply.send(response);
                                    }
                                    None => {
                                        warn!(id = %response.id, "response for unknown request");
                                    }
                                }
                                continue;
                            }
                            BridgeFrame::Qr { code } => TransportEvent::Qr { code },
                            BridgeFrame::Authenticated { credential } => {
                                TransportEvent::Authenticated {
                                    credential: credential.into_bytes(),
                                }
                            }
                            BridgeFrame::AuthFailure { reason } => {
                                TransportEvent::AuthFailure { reason }
                            }
                            BridgeFrame::Ready => TransportEvent::Ready,
                            BridgeFrame::Message { message } => {
                                TransportEvent::Message(message.into_event())
                            }
                        };
                        if event_tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Message::Close(_) => break,
                    _ => {} // Ignore binary, ping (handled by tungstenite layer)
                }
            }
            debug!("bridge reader stopped");
        });

        // First frame: present the resume credential (or ask for pairing).
        if writer_tx.send(ClientFrame::Init { credential }).await.is_err() {
            reader_handle.abort();
            return Err(FamulusError::channel("bridge writer stopped during init"));
        }

        self.writer_tx = Some(writer_tx);
        self.reader_handle = Some(reader_handle);
        self.writer_handle = Some(writer_handle);
        Ok(())
    }

    async fn next_event(&self) -> Result<TransportEvent, FamulusError> {
        let mut rx = self.event_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| FamulusError::channel("bridge event stream closed"))
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, FamulusError> {
        let id = uuid::Uuid::new_v4().to_string();
        let (text, media) = match msg.content {
            OutboundContent::Text(t) => (Some(t), None),
            OutboundContent::Media(payload) => (None, Some(MediaFrame::from_payload(&payload))),
        };
        let frame = ClientFrame::Send {
            id: id.clone(),
            conversation_id: msg.conversation_id.0,
            text,
            media,
            quoted_id: msg.options.quoted.map(|m| m.0),
            as_voice: msg.options.as_voice,
            as_sticker: msg.options.as_sticker,
            mentions: msg.options.mentions,
        };

        let response = self.request(frame, id).await?;
        let message_id = response
            .message_id
            .ok_or_else(|| FamulusError::channel("bridge acknowledged send without a message id"))?;
        Ok(MessageId(message_id))
    }

    async fn set_status(&self, text: &str) -> Result<(), FamulusError> {
        let id = uuid::Uuid::new_v4().to_string();
        let frame = ClientFrame::SetStatus {
            id: id.clone(),
            text: text.to_string(),
        };
        self.request(frame, id).await?;
        Ok(())
    }

    async fn download_media(&self, media: &MediaRef) -> Result<MediaPayload, FamulusError> {
        let id = uuid::Uuid::new_v4().to_string();
        let frame = ClientFrame::DownloadMedia {
            id: id.clone(),
            media_id: media.id.clone(),
        };
        let response = self.request(frame, id).await?;
        response
            .media
            .ok_or_else(|| FamulusError::channel("bridge response carried no media"))?
            .into_payload()
    }

    async fn participants(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<String>, FamulusError> {
        let id = uuid::Uuid::new_v4().to_string();
        let frame = ClientFrame::Participants {
            id: id.clone(),
            conversation_id: conversation_id.0.clone(),
        };
        let response = self.request(frame, id).await?;
        response
            .participants
            .ok_or_else(|| FamulusError::channel("bridge response carried no participants"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> WhatsAppChannel {
        WhatsAppChannel::new(WhatsAppConfig {
            bridge_url: "ws://127.0.0.1:8055/ws".into(),
            request_timeout_secs: 1,
        })
    }

    #[test]
    fn plugin_adapter_metadata() {
        let channel = adapter();
        assert_eq!(channel.name(), "whatsapp");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
    }

    #[test]
    fn capabilities_cover_media_mentions_and_status() {
        let caps = adapter().capabilities();
        assert!(caps.media);
        assert!(caps.mentions);
        assert!(caps.status);
    }

    #[tokio::test]
    async fn requests_before_connect_fail_fast() {
        let channel = adapter();

        let send = channel
            .send(OutboundMessage::text("chat-1".into(), "hello"))
            .await;
        assert!(send.is_err());

        let status = channel.set_status("Uptime: 00:00:01").await;
        assert!(status.is_err());
    }

    #[tokio::test]
    async fn health_check_is_unhealthy_before_connect() {
        let channel = adapter();
        assert!(matches!(
            channel.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }
}
