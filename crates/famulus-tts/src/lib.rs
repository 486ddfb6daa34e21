// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! VoiceRSS text-to-speech adapter for the Famulus chat agent.
//!
//! Implements [`SpeechService`]: a fixed table of accepted language codes
//! plus single-shot MP3 synthesis. Failures never reach the user as text;
//! the command layer logs them and stays silent.

pub mod client;
pub mod languages;

use async_trait::async_trait;
use tracing::debug;

use famulus_config::model::TtsConfig;
use famulus_core::types::{AdapterType, HealthStatus, SpeechLanguage};
use famulus_core::{FamulusError, PluginAdapter, SpeechService};

use crate::client::TtsClient;

/// VoiceRSS-backed implementation of [`SpeechService`].
pub struct VoiceRss {
    client: Option<TtsClient>,
}

impl VoiceRss {
    /// Creates the adapter from configuration.
    ///
    /// With no API key configured, construction succeeds but synthesis
    /// returns a service error.
    pub fn new(config: &TtsConfig) -> Result<Self, FamulusError> {
        let client = match &config.api_key {
            Some(key) => Some(TtsClient::new(config.base_url.clone(), key.clone())?),
            None => None,
        };
        Ok(Self { client })
    }
}

#[async_trait]
impl PluginAdapter for VoiceRss {
    fn name(&self) -> &str {
        "voicerss"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Service
    }

    async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
        match self.client {
            Some(_) => Ok(HealthStatus::Healthy),
            None => Ok(HealthStatus::Degraded("no API key configured".into())),
        }
    }

    async fn shutdown(&self) -> Result<(), FamulusError> {
        debug!("tts adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl SpeechService for VoiceRss {
    fn languages(&self) -> Vec<SpeechLanguage> {
        languages::supported_languages()
    }

    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, FamulusError> {
        // The API reports unknown codes as an in-band ERROR body; reject
        // them before spending a request.
        if !languages::is_supported(language) {
            return Err(FamulusError::service(format!(
                "unsupported TTS language: {language}"
            )));
        }
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FamulusError::service("TTS API key not configured"))?;
        client.synthesize(text, language).await
    }
}
