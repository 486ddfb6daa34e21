// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Famulus agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable identifier of a chat context (direct or group). The addressing
/// unit for all outbound replies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(pub String);

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConversationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Unique identifier for a message, assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter in the plugin registry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Service,
}

/// Opaque handle to a media attachment held by the transport. Resolved to
/// bytes only on an explicit download request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    /// Transport-side identifier for the attachment.
    pub id: String,
    /// MIME type as reported by the transport, when known.
    #[serde(default)]
    pub mimetype: Option<String>,
}

/// Downloaded media content.
#[derive(Debug, Clone)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub mimetype: String,
    pub filename: Option<String>,
}

/// An inbound chat event. Immutable; one per received message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Transport message id, used when replying to this specific message.
    pub id: MessageId,
    /// Identity of the individual sender (distinct from the conversation
    /// in group chats).
    pub sender_id: String,
    /// The conversation this event belongs to.
    pub conversation_id: ConversationId,
    /// Message text. Empty for pure-media messages.
    pub body: String,
    /// Attachment carried by this message, if any.
    #[serde(default)]
    pub attachment: Option<MediaRef>,
    /// The message this one quotes (replies to), if any.
    #[serde(default)]
    pub quoted: Option<Box<InboundEvent>>,
    /// True for broadcast status updates, which are never processed.
    #[serde(default)]
    pub is_broadcast_status: bool,
    /// Transport receive time.
    pub timestamp: DateTime<Utc>,
}

/// Content of an outbound message.
#[derive(Debug, Clone)]
pub enum OutboundContent {
    Text(String),
    Media(MediaPayload),
}

/// Delivery options for an outbound message.
#[derive(Debug, Clone, Default)]
pub struct SendOptions {
    /// Send as a quoted reply to this message.
    pub quoted: Option<MessageId>,
    /// Deliver media as a voice note rather than a file attachment.
    pub as_voice: bool,
    /// Deliver media as a sticker.
    pub as_sticker: bool,
    /// Sender identities to tag in the message.
    pub mentions: Vec<String>,
}

/// An outbound message to be delivered through the channel adapter.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub conversation_id: ConversationId,
    pub content: OutboundContent,
    pub options: SendOptions,
}

impl OutboundMessage {
    /// Plain text message with default options.
    pub fn text(conversation_id: ConversationId, body: impl Into<String>) -> Self {
        Self {
            conversation_id,
            content: OutboundContent::Text(body.into()),
            options: SendOptions::default(),
        }
    }

    /// Text message sent as a quoted reply.
    pub fn reply(conversation_id: ConversationId, quoted: MessageId, body: impl Into<String>) -> Self {
        Self {
            conversation_id,
            content: OutboundContent::Text(body.into()),
            options: SendOptions {
                quoted: Some(quoted),
                ..SendOptions::default()
            },
        }
    }
}

/// Capabilities reported by a channel adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelCapabilities {
    /// Media download/upload (stickers, voice notes) is supported.
    pub media: bool,
    /// Mention tags in outbound messages are supported.
    pub mentions: bool,
    /// The transport exposes a settable presence/status text.
    pub status: bool,
}

/// Lifecycle and message events emitted by a channel adapter.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    /// Out-of-band pairing required; `code` must be shown to the operator.
    Qr { code: String },
    /// The transport accepted our session credential.
    Authenticated { credential: Vec<u8> },
    /// The transport rejected re-authentication. Fatal.
    AuthFailure { reason: String },
    /// The transport is connected and will start delivering messages.
    Ready,
    /// An inbound chat message.
    Message(InboundEvent),
}

/// A persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// A meeting link keyed by its (case-insensitive) subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetLink {
    pub subject: String,
    pub link: String,
}

/// A fully composed outbound email, ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub subject: String,
    pub body: String,
    /// Recipient address.
    pub to: String,
    /// Address set as both the reply-to and the from-header address.
    pub reply_to: String,
    /// Display name on the from header.
    pub from_name: String,
}

/// Current weather for one city, as reported by the weather service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Coarse condition group, e.g. "Clouds".
    pub condition: String,
    /// Free-text description, e.g. "scattered clouds".
    pub description: String,
    /// Temperature in degrees Celsius.
    pub temp_celsius: f64,
}

/// A language supported by the speech synthesis service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechLanguage {
    /// Service language code, e.g. "en-us".
    pub code: String,
    /// Human-readable name, e.g. "English (United States)".
    pub name: String,
}

/// A runtime accepted by the remote code execution service. Doubles as
/// the allow-list consulted before any execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecRuntime {
    /// Canonical language name, e.g. "python".
    pub language: String,
    /// Pinned runtime version, e.g. "3.10.0".
    pub version: String,
}

/// Outcome of a remote code execution request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecOutcome {
    pub language: String,
    pub version: String,
    /// Combined stdout/stderr as captured by the runner.
    pub output: String,
    pub exit_code: Option<i32>,
}
