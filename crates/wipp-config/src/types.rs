// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `wipp_configuration.toml`.

use serde::{Deserialize, Serialize};

/// Message shown when a registration fails without a usable error text.
pub const DEFAULT_ERROR_MESSAGE: &str =
    "Unexpected failure. Please check your Jupyter server logs for more details.";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct WippConfig {
    pub server: ServerConfig,
    pub registration: RegistrationConfig,
    pub logging: LoggingConfig,
}

impl WippConfig {
    /// Base URL the fixed registration path is resolved against.
    pub fn endpoint_base(&self) -> String {
        crate::join_url(&self.server.base_url, &self.server.extension_path)
    }
}

/// Notebook server connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Root URL of the notebook server (e.g. `http://localhost:8888/`)
    pub base_url: String,
    /// Path segment under which the server extension is mounted
    pub extension_path: String,
    /// Notebook server token, sent as `Authorization: token <token>`
    pub token: Option<String>,
    /// Transport-level timeout in seconds
    pub request_timeout_s: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8888/".to_string(),
            extension_path: "wipp".to_string(),
            token: None,
            request_timeout_s: 30,
        }
    }
}

/// Registration behaviour
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Value of the response envelope's `code` field that marks success.
    /// Distinct from the HTTP status, which is checked separately.
    pub success_code: i64,
    pub default_error_message: String,
    /// Default for the "open in WIPP" checkbox
    pub open_in_wipp: bool,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            success_code: 200,
            default_error_message: DEFAULT_ERROR_MESSAGE.to_string(),
            open_in_wipp: false,
        }
    }
}

/// Logging section
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
