// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the VoiceRSS synthesis API.
//!
//! The API answers HTTP 200 for everything; failures arrive as a text
//! body starting with `ERROR` instead of audio bytes, so the client has
//! to sniff the payload.

use std::time::Duration;

use famulus_core::FamulusError;
use tracing::debug;

/// HTTP client for VoiceRSS communication.
#[derive(Debug, Clone)]
pub struct TtsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TtsClient {
    /// Creates a new synthesis API client.
    pub fn new(base_url: String, api_key: String) -> Result<Self, FamulusError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| FamulusError::Service {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Synthesizes `text` in `language`, returning MP3 bytes.
    pub async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, FamulusError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("hl", language),
                ("src", text),
                ("c", "MP3"),
                ("f", "16khz_16bit_mono"),
            ])
            .send()
            .await
            .map_err(|e| FamulusError::Service {
                message: format!("synthesis request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FamulusError::Service {
                message: format!("synthesis API returned {status}: {body}"),
                source: None,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FamulusError::Service {
                message: format!("failed to read synthesis body: {e}"),
                source: Some(Box::new(e)),
            })?
            .to_vec();

        // The in-band failure signal.
        if bytes.starts_with(b"ERROR") {
            let message = String::from_utf8_lossy(&bytes).into_owned();
            return Err(FamulusError::Service {
                message: format!("synthesis API error: {message}"),
                source: None,
            });
        }

        debug!(language, bytes = bytes.len(), "synthesis complete");
        Ok(bytes)
    }
}
