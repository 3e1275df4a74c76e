// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # wipp-observability
//!
//! Logging setup shared by the WIPP plugin crates, with per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: rolling JSON log files in a timestamped run folder

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

pub use cli::*;
pub use config::*;
pub use init::*;

/// Known crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &["wipp-register", "wipp-config", "wipp-observability"];

/// Tracing target for a crate name (`wipp-register` logs under `wipp_register`).
pub fn tracing_target(crate_name: &str) -> String {
    crate_name.replace('-', "_")
}
