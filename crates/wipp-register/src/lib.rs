// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # WIPP notebook registration
//!
//! Registers a notebook with the WIPP extension of a Jupyter server and drives
//! the dialog that reports the result.
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use wipp_register::{HostShell, BusyIndicator};
//! # struct Shell;
//! # struct Spinner;
//! # impl BusyIndicator for Spinner { fn dispose(&mut self) {} }
//! # impl HostShell for Shell {
//! #     fn create_busy_indicator(&self) -> Box<dyn BusyIndicator> { Box::new(Spinner) }
//! #     fn open_url(&self, _: &str, _: &str) -> wipp_register::Result<()> { Ok(()) }
//! # }
//! # async fn run() -> wipp_register::Result<()> {
//! use wipp_register::{DialogContext, RegistrationDialog, RegistrationRequest};
//!
//! let config = wipp_config::WippConfig::default();
//! let context = DialogContext::from_config(&config, Arc::new(Shell))?;
//! let request = RegistrationRequest::new("work/analysis.ipynb", "analysis", "", true)?;
//!
//! let dialog = RegistrationDialog::new(request, context);
//! let state = dialog.settled().await;
//! println!("{:?}: {}", state, dialog.body().text_content());
//! # Ok(())
//! # }
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod client;
pub mod dialog;
mod error;
pub mod host;
pub mod registration;

pub use client::{
    ConfigSettingsResolver, RawResponse, RegistrationClient, ServerSettings, SettingsResolver,
    StaticSettings, Transport, REGISTER_PATH,
};
#[cfg(feature = "http-transport")]
pub use client::ReqwestTransport;
pub use dialog::{DialogBody, DialogContext, DialogState, RegistrationDialog};
pub use error::{RegisterError, Result};
pub use host::{
    BusyIndicator, DiagnosticEvent, DiagnosticSink, HostShell, MountPoint, NullDiagnostics,
    TracingDiagnostics, BLANK_TARGET,
};
pub use registration::{RegistrationInfo, RegistrationOutcome, RegistrationRequest};
