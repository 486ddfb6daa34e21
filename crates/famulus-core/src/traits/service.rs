// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Traits for the external HTTP service adapters.
//!
//! The agent core never talks to a remote API directly; it goes through
//! these narrow contracts so tests can substitute mocks and so each
//! concrete client stays swappable.

use async_trait::async_trait;

use crate::error::FamulusError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ExecOutcome, ExecRuntime, MailMessage, SpeechLanguage, WeatherReport};

/// Weather lookup by city name.
#[async_trait]
pub trait WeatherService: PluginAdapter {
    /// Current weather for `city`.
    async fn current(&self, city: &str) -> Result<WeatherReport, FamulusError>;
}

/// Text-to-speech synthesis.
#[async_trait]
pub trait SpeechService: PluginAdapter {
    /// The language codes this service accepts.
    fn languages(&self) -> Vec<SpeechLanguage>;

    /// Synthesizes `text` in `language`, returning encoded audio bytes.
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, FamulusError>;
}

/// Remote code execution.
#[async_trait]
pub trait ExecService: PluginAdapter {
    /// The runtimes this service will run. Consulted as an allow-list
    /// before any execution request is made.
    fn runtimes(&self) -> Vec<ExecRuntime>;

    /// Executes `source` under the runtime registered for `language`.
    async fn run(&self, language: &str, source: &str) -> Result<ExecOutcome, FamulusError>;
}

/// Outbound mail submission.
#[async_trait]
pub trait MailService: PluginAdapter {
    /// Submits a composed message for delivery. No retry on failure.
    async fn send(&self, message: &MailMessage) -> Result<(), FamulusError>;
}
