// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for WIPP registration

/// Result type alias using RegisterError
pub type Result<T> = std::result::Result<T, RegisterError>;

/// Everything that can go wrong between building a request and reading the reply.
///
/// None of these escape [`crate::RegistrationClient::submit`]; they are folded
/// into a failure outcome there.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegisterError {
    /// The request itself is unusable (empty path or name)
    #[error("Invalid registration request: {0}")]
    InvalidRequest(String),

    /// The network call did not complete (connection refused, timeout, ...)
    #[error("Transport failed: {0}")]
    Transport(String),

    /// The server answered with a non-200 status
    #[error("HTTP status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    HttpStatus { status: u16, message: Option<String> },

    /// The response body was not the expected JSON
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Status 200, but the envelope's embedded code marks a failure
    #[error("Server rejected registration (code {code}): {}", .message.as_deref().unwrap_or("no message"))]
    ServerRejection { code: i64, message: Option<String> },

    /// A host capability (browser, settings) failed
    #[error("Host capability failed: {0}")]
    Host(String),
}

impl RegisterError {
    /// Text to show the user; falls back to `default_message` when the error
    /// carries nothing server-supplied.
    pub fn user_message(&self, default_message: &str) -> String {
        let supplied = match self {
            RegisterError::HttpStatus { message, .. }
            | RegisterError::ServerRejection { message, .. } => message.as_deref(),
            _ => None,
        };
        supplied
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(default_message)
            .to_string()
    }
}

impl From<serde_json::Error> for RegisterError {
    fn from(err: serde_json::Error) -> Self {
        RegisterError::Decode(err.to_string())
    }
}

#[cfg(feature = "http-transport")]
impl From<reqwest::Error> for RegisterError {
    fn from(err: reqwest::Error) -> Self {
        RegisterError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT: &str = "default";

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = RegisterError::HttpStatus {
            status: 500,
            message: Some("disk full".to_string()),
        };
        assert_eq!(err.user_message(DEFAULT), "disk full");

        let err = RegisterError::ServerRejection {
            code: 409,
            message: Some("already registered".to_string()),
        };
        assert_eq!(err.user_message(DEFAULT), "already registered");
    }

    #[test]
    fn test_user_message_defaults() {
        for err in [
            RegisterError::Transport("connection refused".to_string()),
            RegisterError::Decode("expected value".to_string()),
            RegisterError::HttpStatus { status: 502, message: None },
            RegisterError::ServerRejection { code: 500, message: Some("  ".to_string()) },
        ] {
            assert_eq!(err.user_message(DEFAULT), DEFAULT, "{err}");
        }
    }

    #[test]
    fn test_display() {
        let err = RegisterError::HttpStatus { status: 404, message: None };
        assert_eq!(err.to_string(), "HTTP status 404: no message");
    }
}
