// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Famulus chat agent.

use thiserror::Error;

/// The primary error type used across all Famulus adapter traits and core operations.
///
/// User-facing failures (malformed command arguments, invalid addresses,
/// missing notes) are *not* errors: command handlers answer them with a
/// corrective reply and return `Ok`. Only infrastructure and external
/// adapter faults surface here.
#[derive(Debug, Error)]
pub enum FamulusError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (bridge connection failure, malformed frames, send failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// External service adapter errors (weather, TTS, code execution, mail).
    #[error("service error: {message}")]
    Service {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The transport rejected our re-authentication credential. Fatal: the
    /// process terminates and relies on external restart plus re-pairing.
    #[error("transport authentication failure: {0}")]
    AuthFailure(String),

    /// Adapter health check failed.
    #[error("health check failed for {name}: {source}")]
    HealthCheckFailed {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FamulusError {
    /// Convenience constructor for channel errors without an underlying source.
    pub fn channel(message: impl Into<String>) -> Self {
        Self::Channel {
            message: message.into(),
            source: None,
        }
    }

    /// Convenience constructor for service errors without an underlying source.
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            message: message.into(),
            source: None,
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, FamulusError>;
