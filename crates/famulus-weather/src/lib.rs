// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenWeatherMap adapter for the Famulus chat agent.
//!
//! Implements [`WeatherService`] over the current-weather endpoint. A
//! missing API key leaves the adapter constructable but degraded: every
//! lookup fails with a service error the command layer converts into its
//! fixed reply.

pub mod client;
pub mod types;

use async_trait::async_trait;
use tracing::debug;

use famulus_config::model::WeatherConfig;
use famulus_core::types::{AdapterType, HealthStatus, WeatherReport};
use famulus_core::{FamulusError, PluginAdapter, WeatherService};

use crate::client::WeatherClient;

/// OpenWeatherMap-backed implementation of [`WeatherService`].
pub struct OpenWeather {
    client: Option<WeatherClient>,
    default_city: String,
}

impl OpenWeather {
    /// Creates the adapter from configuration.
    ///
    /// With no API key configured, construction succeeds but every
    /// lookup returns a service error.
    pub fn new(config: &WeatherConfig) -> Result<Self, FamulusError> {
        let client = match &config.api_key {
            Some(key) => Some(WeatherClient::new(config.base_url.clone(), key.clone())?),
            None => None,
        };
        Ok(Self {
            client,
            default_city: config.default_city.clone(),
        })
    }

    /// The city used when a lookup does not name one.
    pub fn default_city(&self) -> &str {
        &self.default_city
    }
}

#[async_trait]
impl PluginAdapter for OpenWeather {
    fn name(&self) -> &str {
        "openweather"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Service
    }

    async fn health_check(&self) -> Result<HealthStatus, FamulusError> {
        // No API call; health checks must not spend request quota.
        match self.client {
            Some(_) => Ok(HealthStatus::Healthy),
            None => Ok(HealthStatus::Degraded("no API key configured".into())),
        }
    }

    async fn shutdown(&self) -> Result<(), FamulusError> {
        debug!("weather adapter shutting down");
        Ok(())
    }
}

#[async_trait]
impl WeatherService for OpenWeather {
    async fn current(&self, city: &str) -> Result<WeatherReport, FamulusError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| FamulusError::service("weather API key not configured"))?;

        let parsed = client.fetch_current(city).await?;
        let condition = parsed
            .weather
            .first()
            .ok_or_else(|| FamulusError::service("weather response carried no conditions"))?;

        Ok(WeatherReport {
            condition: condition.main.clone(),
            description: condition.description.clone(),
            temp_celsius: parsed.main.temp,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str, api_key: Option<&str>) -> WeatherConfig {
        WeatherConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
            default_city: "bilaspur".to_string(),
        }
    }

    #[tokio::test]
    async fn adapter_identity() {
        let adapter = OpenWeather::new(&config("http://unused.invalid", Some("k"))).unwrap();
        assert_eq!(adapter.name(), "openweather");
        assert_eq!(adapter.adapter_type(), AdapterType::Service);
        assert_eq!(adapter.default_city(), "bilaspur");
    }

    #[tokio::test]
    async fn current_maps_the_wire_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("q", "raipur"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"main": "Rain", "description": "light rain"}],
                "main": {"temp": 24.8}
            })))
            .mount(&server)
            .await;

        let adapter = OpenWeather::new(&config(&server.uri(), Some("test-key"))).unwrap();
        let report = adapter.current("raipur").await.unwrap();

        assert_eq!(report.condition, "Rain");
        assert_eq!(report.description, "light rain");
        assert!((report.temp_celsius - 24.8).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_any_request() {
        let server = MockServer::start().await;
        // Zero requests expected.
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let adapter = OpenWeather::new(&config(&server.uri(), None)).unwrap();
        let err = adapter.current("bilaspur").await.unwrap_err();
        assert!(err.to_string().contains("not configured"), "got: {err}");
    }

    #[tokio::test]
    async fn health_check_reports_degraded_without_key() {
        let with_key = OpenWeather::new(&config("http://unused.invalid", Some("k"))).unwrap();
        assert_eq!(with_key.health_check().await.unwrap(), HealthStatus::Healthy);

        let without_key = OpenWeather::new(&config("http://unused.invalid", None)).unwrap();
        assert!(matches!(
            without_key.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }

    #[tokio::test]
    async fn empty_conditions_array_is_a_service_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [],
                "main": {"temp": 20.0}
            })))
            .mount(&server)
            .await;

        let adapter = OpenWeather::new(&config(&server.uri(), Some("test-key"))).unwrap();
        assert!(adapter.current("bilaspur").await.is_err());
    }
}
