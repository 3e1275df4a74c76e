// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Registration dialog: state machine, render model and the driver that
//! ties them to a submission.

mod body;
mod registration_dialog;
mod state;

pub use body::{DialogBody, Inline, Label, BODY_CLASS, ERROR_STYLE};
pub use registration_dialog::{DialogContext, RegistrationDialog, DEFAULT_EXTENSION_PATH};
pub use state::{DialogAction, DialogState, DialogStateMachine, Settlement};
