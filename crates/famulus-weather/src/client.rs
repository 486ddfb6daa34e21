// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the OpenWeatherMap current-weather API.

use std::time::Duration;

use famulus_core::FamulusError;
use tracing::debug;

use crate::types::{ApiErrorResponse, CurrentWeatherResponse};

/// HTTP client for OpenWeatherMap communication.
///
/// Single-shot requests; degraded weather is answered at the command
/// layer, so there is no retry here.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Creates a new weather API client.
    pub fn new(base_url: String, api_key: String) -> Result<Self, FamulusError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
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

    /// Fetches current weather for `city` in metric units.
    pub async fn fetch_current(&self, city: &str) -> Result<CurrentWeatherResponse, FamulusError> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", &self.api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| FamulusError::Service {
                message: format!("weather request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, city, "weather response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if let Ok(api_err) = serde_json::from_str::<ApiErrorResponse>(&body) {
                format!("weather API error ({status}): {}", api_err.message)
            } else {
                format!("weather API returned {status}: {body}")
            };
            return Err(FamulusError::Service {
                message,
                source: None,
            });
        }

        response
            .json::<CurrentWeatherResponse>()
            .await
            .map_err(|e| FamulusError::Service {
                message: format!("failed to parse weather response: {e}"),
                source: Some(Box::new(e)),
            })
    }
}
