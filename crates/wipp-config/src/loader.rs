// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, WippConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "wipp_configuration.toml";

/// Find the configuration file
///
/// Search order:
/// 1. `WIPP_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("WIPP_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by WIPP_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "WIPP configuration file '{}' not found in any of these locations:\n{}\n\nSet WIPP_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found, contains invalid TOML, or fails validation
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<WippConfig> {
    let config_file = if let Some(path) = config_path {
        path.to_path_buf()
    } else {
        find_config_file()?
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: WippConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    crate::validate_config(&config)?;

    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `WIPP_BASE_URL` -> `server.base_url`
/// - `WIPP_EXTENSION_PATH` -> `server.extension_path`
/// - `WIPP_TOKEN` -> `server.token`
/// - `WIPP_REQUEST_TIMEOUT_S` -> `server.request_timeout_s`
/// - `WIPP_SUCCESS_CODE` -> `registration.success_code`
/// - `WIPP_OPEN_IN_WIPP` -> `registration.open_in_wipp`
/// - `WIPP_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut WippConfig) {
    if let Ok(value) = env::var("WIPP_BASE_URL") {
        config.server.base_url = value;
    }
    if let Ok(value) = env::var("WIPP_EXTENSION_PATH") {
        config.server.extension_path = value;
    }
    if let Ok(value) = env::var("WIPP_TOKEN") {
        config.server.token = Some(value).filter(|t| !t.is_empty());
    }
    if let Ok(value) = env::var("WIPP_REQUEST_TIMEOUT_S") {
        if let Ok(timeout) = value.parse::<u64>() {
            config.server.request_timeout_s = timeout;
        }
    }
    if let Ok(value) = env::var("WIPP_SUCCESS_CODE") {
        if let Ok(code) = value.parse::<i64>() {
            config.registration.success_code = code;
        }
    }
    if let Ok(value) = env::var("WIPP_OPEN_IN_WIPP") {
        config.registration.open_in_wipp = parse_flag(&value);
    }
    if let Ok(value) = env::var("WIPP_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"base_url": "http://10.0.0.1:8888/"}`)
pub fn apply_cli_overrides(config: &mut WippConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("base_url") {
        config.server.base_url = value.clone();
    }
    if let Some(value) = cli_args.get("extension_path") {
        config.server.extension_path = value.clone();
    }
    if let Some(value) = cli_args.get("token") {
        config.server.token = Some(value.clone()).filter(|t| !t.is_empty());
    }
    if let Some(value) = cli_args.get("request_timeout_s") {
        if let Ok(timeout) = value.parse::<u64>() {
            config.server.request_timeout_s = timeout;
        }
    }
    if let Some(value) = cli_args.get("success_code") {
        if let Ok(code) = value.parse::<i64>() {
            config.registration.success_code = code;
        }
    }
    if let Some(value) = cli_args.get("open_in_wipp") {
        config.registration.open_in_wipp = parse_flag(value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
