// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Famulus chat agent.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Famulus workspace. All adapter plugins
//! implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{FamulusError, Result};
pub use types::{
    AdapterType, ChannelCapabilities, ConversationId, ExecOutcome, ExecRuntime, HealthStatus,
    InboundEvent, MailMessage, MediaPayload, MediaRef, MeetLink, MessageId, NoteEntry,
    OutboundContent, OutboundMessage, SendOptions, SpeechLanguage, TransportEvent, WeatherReport,
};

// Re-export all adapter traits at crate root.
pub use traits::{
    ChannelAdapter, ExecService, MailService, PluginAdapter, SpeechService, StoreAdapter,
    WeatherService,
};
