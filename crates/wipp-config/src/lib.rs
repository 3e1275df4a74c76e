// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # WIPP Plugin Configuration
//!
//! Type-safe configuration loader for the WIPP registration plugin with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//!
//! ## Usage
//!
//! ```rust,no_run
//! use wipp_config::{load_config, WippConfig};
//!
//! let config = load_config(None, None).expect("Failed to load config");
//!
//! println!("Notebook server: {}", config.server.base_url);
//! println!("Registration endpoint base: {}", config.endpoint_base());
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{apply_cli_overrides, apply_environment_overrides, find_config_file, load_config};
pub use types::*;
pub use validation::{validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax: {0}")]
    ParseError(String),

    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Join URL segments, collapsing the `/` separators at each seam.
///
/// Empty segments are skipped so that `join_url("http://h/", "")` stays `http://h`.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    if base.is_empty() {
        return format!("/{}", path);
    }
    format!("{}/{}", base, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_types_compile() {
        let _config = WippConfig::default();
    }

    #[test]
    fn test_join_url_collapses_separators() {
        assert_eq!(
            join_url("http://localhost:8888/", "/wipp"),
            "http://localhost:8888/wipp"
        );
        assert_eq!(join_url("http://h/wipp", "register"), "http://h/wipp/register");
        assert_eq!(join_url("http://h/wipp///", "//register"), "http://h/wipp/register");
    }

    #[test]
    fn test_invalid_values_surface_as_validation_error() {
        let mut config = WippConfig::default();
        config.server.base_url = String::new();
        config.server.request_timeout_s = 0;

        let err = validate_config(&config).unwrap_err();
        // Every error kind the crate produces; validation problems never
        // escape as anything but ValidationError.
        let summary = match &err {
            ConfigError::FileNotFound(_) | ConfigError::IoError(_) | ConfigError::ParseError(_) => {
                panic!("unexpected error kind: {err}")
            }
            ConfigError::ValidationError(msg) => msg,
        };
        assert!(summary.contains("server.base_url"));
        assert!(summary.contains("server.request_timeout_s"));
    }

    #[test]
    fn test_join_url_empty_segments() {
        assert_eq!(join_url("http://h/", ""), "http://h");
        assert_eq!(join_url("", "register"), "/register");
    }
}
