// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./famulus.toml` > `~/.config/famulus/famulus.toml` > `/etc/famulus/famulus.toml`
//! with environment variable overrides via `FAMULUS_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::FamulusConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/famulus/famulus.toml` (system-wide)
/// 3. `~/.config/famulus/famulus.toml` (user XDG config)
/// 4. `./famulus.toml` (local directory)
/// 5. `FAMULUS_*` environment variables
pub fn load_config() -> Result<FamulusConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and for callers that carry their own TOML.
pub fn load_config_from_str(toml_content: &str) -> Result<FamulusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FamulusConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FamulusConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FamulusConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FamulusConfig::default()))
        .merge(Toml::file("/etc/famulus/famulus.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("famulus/famulus.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("famulus.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `FAMULUS_STORAGE_DATABASE_PATH`
/// must map to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("FAMULUS_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: FAMULUS_WEATHER_API_KEY -> "weather_api_key"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("agent_", "agent.", 1)
            .replacen("whatsapp_", "whatsapp.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1)
            .replacen("weather_", "weather.", 1)
            .replacen("tts_", "tts.", 1)
            .replacen("exec_", "exec.", 1)
            .replacen("mail_", "mail.", 1);
        mapped.into()
    })
}
