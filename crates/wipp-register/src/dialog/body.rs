// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Render model of the dialog body.
//!
//! Host-neutral: a [`MountPoint`](crate::host::MountPoint) decides how to
//! show it, [`DialogBody::to_html`] is provided for web hosts.

use std::fmt::Write as _;

/// CSS class of the dialog container.
pub const BODY_CLASS: &str = "jp-RedirectForm";

/// Inline style of the error span.
pub const ERROR_STYLE: &str = "background-color:var(--jp-rendermime-error-background)";

const SPINNER_CLASS: &str = "jp-SpinnerContent";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Break,
    /// Text shown with error styling.
    ErrorText(String),
}

/// One label inside the body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Label {
    pub parts: Vec<Inline>,
}

impl Label {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Inline::Text(text.into())],
        }
    }

    pub fn succeeded(name: &str) -> Self {
        Self::text(format!("Notebook '{}' successfully registered in WIPP", name))
    }

    pub fn failed(name: &str, message: &str) -> Self {
        Self {
            parts: vec![
                Inline::Text(format!(
                    "Notebook '{}' registering in WIPP failed with error:",
                    name
                )),
                Inline::Break,
                Inline::ErrorText(message.to_string()),
            ],
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                Inline::Text(text) | Inline::ErrorText(text) => out.push_str(text),
                Inline::Break => out.push('\n'),
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogBody {
    pub class_name: String,
    pub labels: Vec<Label>,
    pub busy: bool,
}

impl DialogBody {
    /// Empty container with the busy indicator attached.
    pub fn pending() -> Self {
        Self {
            class_name: BODY_CLASS.to_string(),
            labels: Vec::new(),
            busy: true,
        }
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn push_label(&mut self, label: Label) {
        self.labels.push(label);
    }

    /// Plain text of all labels, one per line.
    pub fn text_content(&self) -> String {
        self.labels
            .iter()
            .map(Label::text_content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(html, "<div class=\"{}\">", escape_html(&self.class_name));
        if self.busy {
            let _ = write!(html, "<div class=\"{}\"></div>", SPINNER_CLASS);
        }
        for label in &self.labels {
            html.push_str("<label>");
            for part in &label.parts {
                match part {
                    Inline::Text(text) => html.push_str(&escape_html(text)),
                    Inline::Break => html.push_str("<br>"),
                    Inline::ErrorText(text) => {
                        let _ = write!(
                            html,
                            "<span style=\"{}\">{}</span>",
                            ERROR_STYLE,
                            escape_html(text)
                        );
                    }
                }
            }
            html.push_str("</label>");
        }
        html.push_str("</div>");
        html
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
