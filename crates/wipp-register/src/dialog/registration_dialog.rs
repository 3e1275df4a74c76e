// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};
use wipp_config::join_url;

use super::body::{DialogBody, Label};
use super::state::{DialogAction, DialogState, DialogStateMachine, Settlement};
use crate::client::RegistrationClient;
use crate::host::{
    BusyIndicator, DiagnosticEvent, DiagnosticSink, HostShell, MountPoint, TracingDiagnostics,
    BLANK_TARGET,
};
use crate::registration::RegistrationRequest;

/// Default extension path under the notebook server's base URL.
pub const DEFAULT_EXTENSION_PATH: &str = "wipp";

/// Collaborators shared by every dialog of one host.
#[derive(Clone)]
pub struct DialogContext {
    pub client: Arc<RegistrationClient>,
    pub shell: Arc<dyn HostShell>,
    pub diagnostics: Arc<dyn DiagnosticSink>,
    pub extension_path: String,
}

impl DialogContext {
    pub fn new(client: Arc<RegistrationClient>, shell: Arc<dyn HostShell>) -> Self {
        Self {
            client,
            shell,
            diagnostics: Arc::new(TracingDiagnostics),
            extension_path: DEFAULT_EXTENSION_PATH.to_string(),
        }
    }

    #[cfg(feature = "http-transport")]
    pub fn from_config(
        config: &wipp_config::WippConfig,
        shell: Arc<dyn HostShell>,
    ) -> crate::error::Result<Self> {
        let diagnostics: Arc<dyn DiagnosticSink> = Arc::new(TracingDiagnostics);
        let client = RegistrationClient::from_config(config)?.with_diagnostics(diagnostics.clone());
        Ok(Self {
            client: Arc::new(client),
            shell,
            diagnostics,
            extension_path: config.server.extension_path.clone(),
        })
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn with_extension_path(mut self, path: impl Into<String>) -> Self {
        self.extension_path = path.into();
        self
    }
}

struct DialogInner {
    machine: DialogStateMachine,
    body: DialogBody,
    busy: Option<Box<dyn BusyIndicator>>,
    parent: Option<Arc<dyn MountPoint>>,
}

impl Drop for DialogInner {
    fn drop(&mut self) {
        if let Some(mut indicator) = self.busy.take() {
            indicator.dispose();
        }
    }
}

/// One registration attempt with its UI.
///
/// Construction renders the pending body, attaches a busy indicator and
/// starts the single submission. Everything after that is driven by the
/// submission settling; callers can only observe.
///
/// Host callbacks (`render`, `clear`, `dispose`, `open_url`) never run while
/// the dialog's own state is locked, so they may read the dialog back.
pub struct RegistrationDialog {
    request: RegistrationRequest,
    inner: Arc<Mutex<DialogInner>>,
    state_rx: watch::Receiver<DialogState>,
}

impl RegistrationDialog {
    /// Start registering `request`.
    ///
    /// The submission runs on the current Tokio runtime. Without one the
    /// dialog settles immediately as failed with the default message.
    pub fn new(request: RegistrationRequest, context: DialogContext) -> Self {
        let busy = context.shell.create_busy_indicator();
        let inner = Arc::new(Mutex::new(DialogInner {
            machine: DialogStateMachine::new(
                request.open_in_target(),
                context.client.default_message(),
            ),
            body: DialogBody::pending(),
            busy: Some(busy),
            parent: None,
        }));
        let (state_tx, state_rx) = watch::channel(DialogState::Pending);
        let name = request.name().to_string();

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(err) => {
                warn!(notebook = %name, error = %err, "No async runtime for registration");
                let state = apply_settlement(&inner, &name, Settlement::Unresolved, &context);
                let _ = state_tx.send(state);
                return Self {
                    request,
                    inner,
                    state_rx,
                };
            }
        };

        // One snapshot feeds both the endpoint URL and the request headers.
        let settings = context.client.settings();
        let endpoint_base = join_url(&settings.base_url, &context.extension_path);

        let client = context.client.clone();
        let submitted = request.clone();
        let submission = handle.spawn(async move {
            client
                .submit_with_settings(&submitted, &endpoint_base, &settings)
                .await
        });

        let driver_inner = inner.clone();
        handle.spawn(async move {
            let settlement = match submission.await {
                Ok(outcome) => Settlement::Resolved(outcome),
                Err(err) => {
                    warn!(notebook = %name, error = %err, "Registration task did not complete");
                    Settlement::Unresolved
                }
            };
            let state = apply_settlement(&driver_inner, &name, settlement, &context);
            let _ = state_tx.send(state);
        });

        Self {
            request,
            inner,
            state_rx,
        }
    }

    pub fn request(&self) -> &RegistrationRequest {
        &self.request
    }

    pub fn state(&self) -> DialogState {
        self.inner.lock().machine.state().clone()
    }

    /// Snapshot of the current body.
    pub fn body(&self) -> DialogBody {
        self.inner.lock().body.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.inner.lock().busy.is_some()
    }

    /// Wait for the terminal state.
    pub async fn settled(&self) -> DialogState {
        let mut rx = self.state_rx.clone();
        let settled = match rx.wait_for(DialogState::is_terminal).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    /// Attach to `parent` and render the current body into it.
    pub fn mount(&self, parent: Arc<dyn MountPoint>) {
        let body = {
            let mut inner = self.inner.lock();
            inner.parent = Some(parent.clone());
            inner.body.clone()
        };
        parent.render(&body);

        // A settlement landing between the snapshot and the render above
        // would otherwise leave the parent showing the pending body.
        let latest = self.body();
        if latest != body {
            parent.render(&latest);
        }
    }

    pub fn unmount(&self) {
        let parent = self.inner.lock().parent.take();
        if let Some(parent) = parent {
            parent.clear();
        }
    }
}

fn apply_settlement(
    inner: &Mutex<DialogInner>,
    name: &str,
    settlement: Settlement,
    context: &DialogContext,
) -> DialogState {
    let mut released = None;
    let mut open_target = None;
    let (state, render) = {
        let mut inner = inner.lock();
        let actions = inner.machine.settle(settlement);
        if actions.is_empty() {
            return inner.machine.state().clone();
        }
        for action in actions {
            match action {
                DialogAction::ReleaseBusyIndicator => {
                    released = inner.busy.take();
                    inner.body.set_busy(false);
                }
                DialogAction::RenderSucceeded => inner.body.push_label(Label::succeeded(name)),
                DialogAction::RenderFailed { message } => {
                    inner.body.push_label(Label::failed(name, &message))
                }
                DialogAction::OpenTarget { url } => open_target = Some(url),
            }
        }
        let render = inner
            .parent
            .clone()
            .map(|parent| (parent, inner.body.clone()));
        (inner.machine.state().clone(), render)
    };

    if let Some(mut indicator) = released {
        indicator.dispose();
    }
    if let Some((parent, body)) = render {
        parent.render(&body);
    }

    context.diagnostics.record(DiagnosticEvent::StateChanged {
        name: name.to_string(),
        state: state.clone(),
    });

    if let Some(url) = open_target {
        debug!(%url, "Opening registered notebook");
        if let Err(err) = context.shell.open_url(&url, BLANK_TARGET) {
            context.diagnostics.record(DiagnosticEvent::OpenFailed {
                url,
                reason: err.to_string(),
            });
        }
    }

    state
}
