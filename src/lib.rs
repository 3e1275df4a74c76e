//! # jupyterlab-wipp - register Jupyter notebooks in WIPP
//!
//! Sends a notebook's path, name and description to the WIPP extension of a
//! Jupyter server and reports the result in a dialog, optionally opening the
//! registered notebook in the WIPP catalog.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! jupyterlab-wipp = "0.1"  # Default: reqwest transport
//! ```
//!
//! ## Feature Flags
//!
//! - **`http-transport`** (default): reqwest-backed [`ReqwestTransport`](register::ReqwestTransport)
//! - **`file-logging`**: rolling log files in timestamped run folders
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use jupyterlab_wipp::prelude::*;
//! # struct Shell;
//! # struct Spinner;
//! # impl BusyIndicator for Spinner { fn dispose(&mut self) {} }
//! # impl HostShell for Shell {
//! #     fn create_busy_indicator(&self) -> Box<dyn BusyIndicator> { Box::new(Spinner) }
//! #     fn open_url(&self, _: &str, _: &str) -> jupyterlab_wipp::register::Result<()> { Ok(()) }
//! # }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let session = jupyterlab_wipp::bootstrap(None, None)?;
//! let context = DialogContext::from_config(&session.config, Arc::new(Shell))?;
//!
//! let request = RegistrationRequest::with_config_defaults(
//!     "work/analysis.ipynb",
//!     "analysis",
//!     "Cell counts for plate 3",
//!     &session.config.registration,
//! )?;
//! let dialog = RegistrationDialog::new(request, context);
//! match dialog.settled().await {
//!     DialogState::Succeeded => println!("registered"),
//!     DialogState::Failed(message) => eprintln!("{}", message),
//!     DialogState::Pending => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: wipp-config, wipp-observability            │
//! │  (TOML + overrides, tracing-subscriber setup)           │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  wipp-register                                          │
//! │  (RegistrationClient, dialog state machine, host traits)│
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

// Re-export foundation
pub use wipp_config as config;
pub use wipp_observability as observability;

// Re-export registration
pub use wipp_register as register;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_config, WippConfig};
    pub use crate::observability::{init_logging, parse_debug_flags, CrateDebugFlags};
    pub use crate::register::{
        BusyIndicator, DialogBody, DialogContext, DialogState, HostShell, MountPoint,
        RegistrationClient, RegistrationDialog, RegistrationOutcome, RegistrationRequest,
    };

    #[cfg(feature = "http-transport")]
    pub use crate::register::ReqwestTransport;
}

/// Loaded configuration plus the logging guard that must outlive the session.
pub struct Session {
    pub config: config::WippConfig,
    pub logging: observability::LoggingGuard,
}

/// Logging settings derived from the `[logging]` section.
pub fn logging_config(config: &config::WippConfig) -> observability::LoggingConfig {
    observability::LoggingConfig::new(
        config.logging.level.clone(),
        observability::LogFormat::from_name(&config.logging.format),
    )
}

/// Load configuration and install console logging in one step.
///
/// Debug flags come from the process arguments and `WIPP_DEBUG`.
pub fn bootstrap(
    config_path: Option<&Path>,
    cli_overrides: Option<&HashMap<String, String>>,
) -> anyhow::Result<Session> {
    let config = config::load_config(config_path, cli_overrides)
        .context("Failed to load WIPP configuration")?;
    let flags = observability::parse_debug_flags();
    let logging = observability::init_logging(&flags, &logging_config(&config))?;
    Ok(Session { config, logging })
}
