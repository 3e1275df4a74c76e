// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pure, deterministic dialog state machine.
//!
//! The machine performs no I/O. It consumes the settlement of a registration
//! and returns the [`DialogAction`]s the driver must carry out, in order.

use crate::registration::RegistrationOutcome;

/// Where a registration dialog is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    Pending,
    Succeeded,
    Failed(String),
}

impl DialogState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DialogState::Pending)
    }
}

/// How the registration attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Resolved(RegistrationOutcome),
    /// The attempt was abandoned without producing an outcome.
    Unresolved,
}

/// Side effects requested by the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogAction {
    ReleaseBusyIndicator,
    RenderSucceeded,
    RenderFailed { message: String },
    OpenTarget { url: String },
}

#[derive(Debug, Clone)]
pub struct DialogStateMachine {
    state: DialogState,
    open_in_target: bool,
    default_message: String,
}

impl DialogStateMachine {
    pub fn new(open_in_target: bool, default_message: impl Into<String>) -> Self {
        Self {
            state: DialogState::Pending,
            open_in_target,
            default_message: default_message.into(),
        }
    }

    pub fn state(&self) -> &DialogState {
        &self.state
    }

    /// Apply the settlement. Only the first call transitions; later calls
    /// return no actions.
    pub fn settle(&mut self, settlement: Settlement) -> Vec<DialogAction> {
        if self.state.is_terminal() {
            return Vec::new();
        }

        let mut actions = vec![DialogAction::ReleaseBusyIndicator];
        match settlement {
            Settlement::Resolved(RegistrationOutcome::Success { url, id }) => {
                self.state = DialogState::Succeeded;
                actions.push(DialogAction::RenderSucceeded);
                if self.open_in_target {
                    actions.push(DialogAction::OpenTarget {
                        url: format!("{}{}", url, id),
                    });
                }
            }
            Settlement::Resolved(RegistrationOutcome::Failure { message }) => {
                self.fail(message, &mut actions);
            }
            Settlement::Unresolved => {
                let message = self.default_message.clone();
                self.fail(message, &mut actions);
            }
        }
        actions
    }

    fn fail(&mut self, message: String, actions: &mut Vec<DialogAction>) {
        self.state = DialogState::Failed(message.clone());
        actions.push(DialogAction::RenderFailed { message });
    }
}
