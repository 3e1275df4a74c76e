// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Capabilities supplied by the host application shell.
//!
//! The registration core never touches a document or a window directly; it
//! asks the host for a busy indicator, a place to render into and a way to
//! open links, and reports diagnostics to an injected sink.

use tracing::{debug, info, warn};

use crate::dialog::{DialogBody, DialogState};
use crate::error::Result;

/// Browsing-context target for links opened after a successful registration.
pub const BLANK_TARGET: &str = "_blank";

/// Transient "work in progress" element owned by one dialog.
pub trait BusyIndicator: Send {
    /// Remove the indicator from view and release it. Must tolerate repeated calls.
    fn dispose(&mut self);
}

/// Host-provided UI services.
pub trait HostShell: Send + Sync {
    fn create_busy_indicator(&self) -> Box<dyn BusyIndicator>;

    /// Open `url` in the browsing context named by `target`.
    fn open_url(&self, url: &str, target: &str) -> Result<()>;
}

/// The parent a dialog body is mounted into.
pub trait MountPoint: Send + Sync {
    /// Replace whatever is shown with `body`.
    fn render(&self, body: &DialogBody);

    fn clear(&self);
}

/// Things worth reporting while a registration runs.
#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticEvent {
    RequestIssued { url: String },
    ResponseReceived { url: String, status: u16, body: String },
    TransportFailed { url: String, reason: String },
    StateChanged { name: String, state: DialogState },
    OpenFailed { url: String, reason: String },
}

/// Receiver for [`DiagnosticEvent`]s.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: DiagnosticEvent);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn record(&self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::RequestIssued { url } => {
                debug!(%url, "Registering notebook in WIPP");
            }
            DiagnosticEvent::ResponseReceived { url, status, body } => {
                debug!(%url, status, %body, "WIPP registration response");
            }
            DiagnosticEvent::TransportFailed { url, reason } => {
                warn!(%url, %reason, "WIPP registration request failed");
            }
            DiagnosticEvent::StateChanged { name, state } => {
                info!(notebook = %name, ?state, "Registration dialog settled");
            }
            DiagnosticEvent::OpenFailed { url, reason } => {
                warn!(%url, %reason, "Could not open registered notebook");
            }
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl DiagnosticSink for NullDiagnostics {
    fn record(&self, _event: DiagnosticEvent) {}
}
