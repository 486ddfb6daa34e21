// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the OpenWeatherMap current-weather endpoint.

use serde::Deserialize;

/// Response body of `GET /weather?q=<city>&units=metric`.
///
/// Only the fields the agent renders are modeled; everything else the API
/// sends is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CurrentWeatherResponse {
    pub weather: Vec<ConditionEntry>,
    pub main: MainReadings,
}

/// One entry of the `weather` array.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionEntry {
    /// Coarse condition group, e.g. "Clouds".
    pub main: String,
    /// Free-text description, e.g. "scattered clouds".
    pub description: String,
}

/// The `main` block carrying temperature readings.
#[derive(Debug, Clone, Deserialize)]
pub struct MainReadings {
    /// Celsius when the request asked for metric units.
    pub temp: f64,
}

/// Error body, e.g. `{"cod":"404","message":"city not found"}`.
///
/// `cod` arrives as a string or a number depending on the endpoint, so it
/// is not modeled; the message is all the agent reports.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}
