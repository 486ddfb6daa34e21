// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for the messaging transport.

use async_trait::async_trait;

use crate::error::FamulusError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    ChannelCapabilities, ConversationId, MediaPayload, MediaRef, MessageId, OutboundMessage,
    TransportEvent,
};

/// Adapter for the bidirectional messaging transport.
///
/// The transport protocol itself lives outside this process; the adapter
/// only needs to deliver [`TransportEvent`]s in arrival order and accept
/// outbound messages.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Returns the capabilities supported by this channel.
    fn capabilities(&self) -> ChannelCapabilities;

    /// Establishes the transport connection, presenting `resume` as the
    /// reconnection credential when one was persisted by a prior run.
    async fn connect(&mut self, resume: Option<Vec<u8>>) -> Result<(), FamulusError>;

    /// Receives the next transport event. Events for one conversation are
    /// delivered in arrival order.
    async fn next_event(&self) -> Result<TransportEvent, FamulusError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, FamulusError>;

    /// Sets the account presence/status text, where the transport supports it.
    async fn set_status(&self, text: &str) -> Result<(), FamulusError>;

    /// Downloads the bytes behind a media reference.
    async fn download_media(&self, media: &MediaRef) -> Result<MediaPayload, FamulusError>;

    /// Lists the sender identities participating in a conversation.
    async fn participants(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<String>, FamulusError>;
}
