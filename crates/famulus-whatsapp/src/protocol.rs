// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire protocol between the adapter and the WhatsApp bridge.
//!
//! One JSON document per WebSocket text frame, tagged by `type`.
//!
//! Bridge -> adapter:
//! ```json
//! {"type": "qr", "code": "2@abc..."}
//! {"type": "authenticated", "credential": "<opaque string>"}
//! {"type": "auth_failure", "reason": "logged out"}
//! {"type": "ready"}
//! {"type": "message", "message": {"id": "...", "sender_id": "...", ...}}
//! {"type": "response", "id": "<request id>", "ok": true, ...}
//! ```
//!
//! Adapter -> bridge:
//! ```json
//! {"type": "init", "credential": "<opaque string>"}
//! {"type": "send", "id": "...", "conversation_id": "...", "text": "..."}
//! {"type": "set_status", "id": "...", "text": "..."}
//! {"type": "download_media", "id": "...", "media_id": "..."}
//! {"type": "participants", "id": "...", "conversation_id": "..."}
//! ```

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use famulus_core::types::{InboundEvent, MediaPayload, MediaRef, MessageId};
use famulus_core::FamulusError;

/// A frame received from the bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BridgeFrame {
    /// Pairing needed; `code` must be shown to the operator.
    Qr { code: String },
    /// The bridge accepted or established a session.
    Authenticated { credential: String },
    /// Re-authentication was rejected.
    AuthFailure { reason: String },
    /// Connected; messages will follow.
    Ready,
    /// An inbound chat message.
    Message { message: MessageFrame },
    /// Reply to an adapter request, correlated by `id`.
    Response(ResponseFrame),
}

/// Reply to one adapter request.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseFrame {
    pub id: String,
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub media: Option<MediaFrame>,
    #[serde(default)]
    pub participants: Option<Vec<String>>,
}

/// An inbound message as the bridge reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageFrame {
    pub id: String,
    pub sender_id: String,
    pub conversation_id: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub attachment: Option<MediaRef>,
    #[serde(default)]
    pub quoted: Option<Box<MessageFrame>>,
    #[serde(default)]
    pub is_broadcast_status: bool,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl MessageFrame {
    /// Converts the wire form into the core event type. A missing
    /// timestamp falls back to the receive time.
    pub fn into_event(self) -> InboundEvent {
        InboundEvent {
            id: MessageId(self.id),
            sender_id: self.sender_id,
            conversation_id: self.conversation_id.as_str().into(),
            body: self.body,
            attachment: self.attachment,
            quoted: self.quoted.map(|q| Box::new(q.into_event())),
            is_broadcast_status: self.is_broadcast_status,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
        }
    }
}

/// Media content carried inline, base64-encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaFrame {
    pub data: String,
    pub mimetype: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl MediaFrame {
    /// Encodes payload bytes for the wire.
    pub fn from_payload(payload: &MediaPayload) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(&payload.bytes),
            mimetype: payload.mimetype.clone(),
            filename: payload.filename.clone(),
        }
    }

    /// Decodes the wire form back into payload bytes.
    pub fn into_payload(self) -> Result<MediaPayload, FamulusError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| FamulusError::Channel {
                message: format!("bridge sent invalid base64 media: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(MediaPayload {
            bytes,
            mimetype: self.mimetype,
            filename: self.filename,
        })
    }
}

/// A frame sent to the bridge.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientFrame {
    /// First frame after connect; presents the resume credential if any.
    Init {
        #[serde(skip_serializing_if = "Option::is_none")]
        credential: Option<String>,
    },
    /// Deliver a message.
    Send {
        id: String,
        conversation_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        media: Option<MediaFrame>,
        #[serde(skip_serializing_if = "Option::is_none")]
        quoted_id: Option<String>,
        as_voice: bool,
        as_sticker: bool,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        mentions: Vec<String>,
    },
    /// Set the account status text.
    SetStatus { id: String, text: String },
    /// Resolve a media reference to bytes.
    DownloadMedia { id: String, media_id: String },
    /// List sender identities in a conversation.
    Participants { id: String, conversation_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_frames_deserialize_by_tag() {
        let qr: BridgeFrame = serde_json::from_str(r#"{"type":"qr","code":"2@abc"}"#).unwrap();
        assert!(matches!(qr, BridgeFrame::Qr { code } if code == "2@abc"));

        let ready: BridgeFrame = serde_json::from_str(r#"{"type":"ready"}"#).unwrap();
        assert!(matches!(ready, BridgeFrame::Ready));

        let auth: BridgeFrame =
            serde_json::from_str(r#"{"type":"authenticated","credential":"blob"}"#).unwrap();
        assert!(matches!(auth, BridgeFrame::Authenticated { credential } if credential == "blob"));
    }

    #[test]
    fn response_frame_deserializes_inside_the_tagged_enum() {
        let frame: BridgeFrame = serde_json::from_str(
            r#"{"type":"response","id":"req-1","ok":true,"message_id":"m-9"}"#,
        )
        .unwrap();
        match frame {
            BridgeFrame::Response(r) => {
                assert_eq!(r.id, "req-1");
                assert!(r.ok);
                assert_eq!(r.message_id.as_deref(), Some("m-9"));
                assert!(r.error.is_none());
            }
            other => panic!("expected response frame, got {other:?}"),
        }
    }

    #[test]
    fn message_frame_converts_with_quoted_recursion() {
        let frame: BridgeFrame = serde_json::from_str(
            r#"{
                "type": "message",
                "message": {
                    "id": "m-2",
                    "sender_id": "491701111111@c.us",
                    "conversation_id": "chat-1",
                    "body": "!tts",
                    "quoted": {
                        "id": "m-1",
                        "sender_id": "491702222222@c.us",
                        "conversation_id": "chat-1",
                        "body": "read this aloud"
                    }
                }
            }"#,
        )
        .unwrap();

        let BridgeFrame::Message { message } = frame else {
            panic!("expected message frame");
        };
        let event = message.into_event();
        assert_eq!(event.body, "!tts");
        assert!(!event.is_broadcast_status);
        let quoted = event.quoted.expect("quoted event");
        assert_eq!(quoted.body, "read this aloud");
        assert!(quoted.quoted.is_none());
    }

    #[test]
    fn client_send_frame_serializes_sparsely() {
        let frame = ClientFrame::Send {
            id: "req-7".into(),
            conversation_id: "chat-1".into(),
            text: Some("pong!".into()),
            media: None,
            quoted_id: None,
            as_voice: false,
            as_sticker: false,
            mentions: vec![],
        };
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["type"], "send");
        assert_eq!(json["text"], "pong!");
        // Absent options stay off the wire.
        assert!(json.get("media").is_none());
        assert!(json.get("quoted_id").is_none());
        assert!(json.get("mentions").is_none());
    }

    #[test]
    fn media_frame_round_trips_bytes() {
        let payload = MediaPayload {
            bytes: vec![0x4f, 0x67, 0x67, 0x53],
            mimetype: "audio/mpeg".into(),
            filename: Some("tts.mp3".into()),
        };
        let frame = MediaFrame::from_payload(&payload);
        let back = frame.into_payload().unwrap();
        assert_eq!(back.bytes, payload.bytes);
        assert_eq!(back.mimetype, "audio/mpeg");
        assert_eq!(back.filename.as_deref(), Some("tts.mp3"));
    }

    #[test]
    fn invalid_base64_media_is_rejected() {
        let frame = MediaFrame {
            data: "!!! not base64 !!!".into(),
            mimetype: "image/png".into(),
            filename: None,
        };
        assert!(frame.into_payload().is_err());
    }
}
