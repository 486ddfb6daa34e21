// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Famulus chat agent.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Famulus configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FamulusConfig {
    /// Agent identity and runtime behavior settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// WhatsApp bridge transport settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Weather service settings.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Text-to-speech service settings.
    #[serde(default)]
    pub tts: TtsConfig,

    /// Remote code execution service settings.
    #[serde(default)]
    pub exec: ExecConfig,

    /// Outbound mail (SMTP submission) settings.
    #[serde(default)]
    pub mail: MailConfig,
}

/// Agent identity and runtime behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Conversation id of the owner. Receives the boot notice and is the
    /// only identity whose `!whitelist` bypasses the introvert gate.
    #[serde(default)]
    pub owner: Option<String>,

    /// Start in introvert mode: only whitelisted conversations are answered.
    #[serde(default = "default_introvert")]
    pub introvert: bool,

    /// Conversations whitelisted from boot, before any `!whitelist`.
    #[serde(default)]
    pub whitelist: Vec<String>,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            owner: None,
            introvert: default_introvert(),
            whitelist: Vec::new(),
            log_level: default_log_level(),
        }
    }
}

fn default_introvert() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

/// WhatsApp bridge transport configuration.
///
/// The bridge is a sidecar process owning the vendor protocol; this agent
/// connects to it over a WebSocket speaking line-delimited JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// WebSocket URL of the bridge.
    #[serde(default = "default_bridge_url")]
    pub bridge_url: String,

    /// Seconds to wait for a bridge request/response round trip
    /// (media download, participant listing).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            bridge_url: default_bridge_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_bridge_url() -> String {
    "ws://127.0.0.1:8055/ws".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("famulus").join("famulus.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("famulus.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Address to bind the HTTP server to.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind the HTTP server to.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Shared secret required by the sleep endpoint (`X-Famulus-Secret`
    /// header). `None` disables the endpoint.
    #[serde(default)]
    pub shared_secret: Option<String>,

    /// Conversations webhook payloads are forwarded to when the payload
    /// names none itself.
    #[serde(default)]
    pub webhook_targets: Vec<String>,

    /// Exact-match values struck from webhook text before forwarding,
    /// on top of the built-in secret patterns.
    #[serde(default)]
    pub webhook_redact: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            shared_secret: None,
            webhook_targets: Vec::new(),
            webhook_redact: Vec::new(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    3000
}

/// Weather service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherConfig {
    /// Weather API key. `None` leaves `!weather` degraded to its error reply.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the weather API.
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,

    /// City used by `!weather` without an argument and by the welcome
    /// greeting.
    #[serde(default = "default_city")]
    pub default_city: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
            default_city: default_city(),
        }
    }
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_city() -> String {
    "bilaspur".to_string()
}

/// Text-to-speech service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TtsConfig {
    /// TTS API key. `None` leaves `!tts` as a silent no-op.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the TTS API.
    #[serde(default = "default_tts_base_url")]
    pub base_url: String,

    /// Language code used until `!ttslang` switches it.
    #[serde(default = "default_tts_language")]
    pub default_language: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_tts_base_url(),
            default_language: default_tts_language(),
        }
    }
}

fn default_tts_base_url() -> String {
    "https://api.voicerss.org".to_string()
}

fn default_tts_language() -> String {
    "en-us".to_string()
}

/// Remote code execution service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ExecConfig {
    /// Base URL of the execution API.
    #[serde(default = "default_exec_base_url")]
    pub base_url: String,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            base_url: default_exec_base_url(),
        }
    }
}

fn default_exec_base_url() -> String {
    "https://emkc.org/api/v2/piston".to_string()
}

/// Outbound mail configuration (SMTP submission).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// SMTP relay host.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    /// SMTP relay port (STARTTLS submission).
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP username. `None` leaves the email composer degraded to its
    /// failure reply on send.
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password.
    #[serde(default)]
    pub password: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            username: None,
            password: None,
        }
    }
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

fn default_smtp_port() -> u16 {
    587
}
