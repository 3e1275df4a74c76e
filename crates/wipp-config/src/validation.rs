// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Collects every problem in one pass so the user sees all of them at once.

use crate::{ConfigError, ConfigResult, WippConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Required fields (server base URL, default error message)
/// - URL scheme of the server base URL
/// - Positive transport timeout
/// - Known logging level and format
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &WippConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_required_fields(config, &mut errors);
    validate_server(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_required_fields(config: &WippConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.server.base_url.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "server.base_url".to_string(),
        });
    }

    if config.registration.default_error_message.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "registration.default_error_message".to_string(),
        });
    }
}

fn validate_server(config: &WippConfig, errors: &mut Vec<ConfigValidationError>) {
    let base_url = config.server.base_url.trim();
    if !base_url.is_empty()
        && !base_url.starts_with("http://")
        && !base_url.starts_with("https://")
    {
        errors.push(ConfigValidationError::InvalidValue {
            field: "server.base_url".to_string(),
            reason: "must start with http:// or https://".to_string(),
        });
    }

    if config.server.request_timeout_s == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "server.request_timeout_s".to_string(),
            reason: "must be positive".to_string(),
        });
    }
}

fn validate_logging(config: &WippConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!("must be one of {}", LOG_LEVELS.join(", ")),
        });
    }

    let format = config.logging.format.to_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.format".to_string(),
            reason: "must be 'text' or 'json'".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WippConfig::default();
        let result = validate_config(&config);
        if let Err(e) = &result {
            eprintln!("Validation error: {}", e);
        }
        assert!(result.is_ok());
    }

    #[test]
    fn test_missing_base_url() {
        let mut config = WippConfig::default();
        config.server.base_url = "  ".to_string();

        let result = validate_config(&config);
        match result {
            Err(ConfigError::ValidationError(msg)) => assert!(msg.contains("server.base_url")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_scheme() {
        let mut config = WippConfig::default();
        config.server.base_url = "ftp://notebooks/".to_string();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("http:// or https://"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = WippConfig::default();
        config.server.request_timeout_s = 0;
        config.registration.default_error_message = String::new();
        config.logging.level = "verbose".to_string();
        config.logging.format = "yaml".to_string();

        match validate_config(&config) {
            Err(ConfigError::ValidationError(msg)) => {
                assert!(msg.contains("server.request_timeout_s"));
                assert!(msg.contains("registration.default_error_message"));
                assert!(msg.contains("logging.level"));
                assert!(msg.contains("logging.format"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_log_level_is_case_insensitive() {
        let mut config = WippConfig::default();
        config.logging.level = "DEBUG".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
