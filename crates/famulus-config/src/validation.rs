// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as valid bind addresses, non-empty paths, and
//! well-formed service URLs.

use crate::diagnostic::ConfigError;
use crate::model::FamulusConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FamulusConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate gateway.host looks like a valid IP or hostname
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    // Validate service base URLs carry an http(s) or ws(s) scheme
    check_url(&mut errors, "weather.base_url", &config.weather.base_url, &["http://", "https://"]);
    check_url(&mut errors, "tts.base_url", &config.tts.base_url, &["http://", "https://"]);
    check_url(&mut errors, "exec.base_url", &config.exec.base_url, &["http://", "https://"]);
    check_url(
        &mut errors,
        "whatsapp.bridge_url",
        &config.whatsapp.bridge_url,
        &["ws://", "wss://"],
    );

    if config.whatsapp.request_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "whatsapp.request_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.mail.smtp_port == 0 {
        errors.push(ConfigError::Validation {
            message: "mail.smtp_port must be nonzero".to_string(),
        });
    }

    if config.tts.default_language.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "tts.default_language must not be empty".to_string(),
        });
    }

    // A secret that trims to nothing would make the sleep endpoint
    // unlockable with whitespace; reject it outright.
    if config
        .gateway
        .shared_secret
        .as_deref()
        .is_some_and(|secret| secret.trim().is_empty())
    {
        errors.push(ConfigError::Validation {
            message: "gateway.shared_secret must not be blank (omit it to disable the endpoint)"
                .to_string(),
        });
    }

    for (i, entry) in config.agent.whitelist.iter().enumerate() {
        if entry.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("agent.whitelist[{i}] must not be empty"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ConfigError>, key: &str, value: &str, schemes: &[&str]) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(ConfigError::Validation {
            message: format!("{key} must not be empty"),
        });
        return;
    }
    if !schemes.iter().any(|s| value.starts_with(s)) {
        errors.push(ConfigError::Validation {
            message: format!("{key} `{value}` must start with one of: {}", schemes.join(", ")),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = FamulusConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = FamulusConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("database_path"))));
    }

    #[test]
    fn schemeless_weather_url_fails_validation() {
        let mut config = FamulusConfig::default();
        config.weather.base_url = "api.openweathermap.org".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("weather.base_url"))));
    }

    #[test]
    fn http_bridge_url_fails_validation() {
        let mut config = FamulusConfig::default();
        config.whatsapp.bridge_url = "http://127.0.0.1:8055".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("bridge_url"))));
    }

    #[test]
    fn blank_shared_secret_fails_validation() {
        let mut config = FamulusConfig::default();
        config.gateway.shared_secret = Some("   ".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("shared_secret"))));
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = FamulusConfig::default();
        config.gateway.host = "0.0.0.0".to_string();
        config.storage.database_path = "/tmp/test.db".to_string();
        config.gateway.shared_secret = Some("hunter2".to_string());
        config.agent.whitelist = vec!["123@g.us".to_string()];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn zero_smtp_port_fails_validation() {
        let mut config = FamulusConfig::default();
        config.mail.smtp_port = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("smtp_port"))));
    }
}
