// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weather lookup: `!weather [city]`, also embedded in the welcome greeting.

use famulus_core::types::{InboundEvent, OutboundMessage, WeatherReport};
use famulus_core::FamulusError;
use tracing::warn;

use crate::AgentContext;

/// Answers `!weather`, falling back to the configured default city.
pub(crate) async fn report(
    ctx: &AgentContext,
    event: &InboundEvent,
    args: &str,
) -> Result<(), FamulusError> {
    let city = if args.is_empty() {
        ctx.config.weather.default_city.as_str()
    } else {
        args
    };
    let text = lookup_text(ctx, city).await;
    ctx.channel
        .send(OutboundMessage::text(event.conversation_id.clone(), text))
        .await?;
    Ok(())
}

/// The weather line for `city`, degraded to the fixed error text when the
/// adapter fails. Never an `Err`.
pub(crate) async fn lookup_text(ctx: &AgentContext, city: &str) -> String {
    match ctx.services.weather.current(city).await {
        Ok(report) => render(city, &report),
        Err(e) => {
            warn!(city, error = %e, "weather lookup failed");
            "Some error occured.".to_string()
        }
    }
}

fn render(city: &str, report: &WeatherReport) -> String {
    let emoji = condition_emoji(&report.description);
    let temp = report.temp_celsius;
    if report.condition == "Clouds" {
        format!(
            "Clouds in {city}. {} {emoji}\nIt's currently {temp}℃ in {city}",
            report.description
        )
    } else {
        format!(
            "Weather is {} in {city}. {} {emoji}\nIt's currently {temp}℃ in {city}",
            report.condition, report.description
        )
    }
}

fn condition_emoji(description: &str) -> &'static str {
    if description.contains("rain") {
        "🌧️"
    } else if description.contains("clear") {
        "☀️"
    } else if description.contains("clouds") {
        "🌤"
    } else if description.contains("drizzl") {
        "🌩️"
    } else if description.contains("haze") {
        "🌫️"
    } else {
        "🌤️"
    }
}
