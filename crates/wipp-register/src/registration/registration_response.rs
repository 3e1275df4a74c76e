// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{RegisterError, Result};

/// Body of a 200 response from the registration endpoint.
///
/// `code` is the service's own status and is checked independently of the
/// HTTP status. `info` stays raw until `code` signals success, so a rejection
/// carrying a partial `info` still yields its `error` text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    pub code: i64,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub info: Option<serde_json::Value>,
}

impl ResponseEnvelope {
    /// Decode `info`; absent or malformed info is a [`RegisterError::Decode`].
    pub fn into_info(self) -> Result<RegistrationInfo> {
        let info = self.info.ok_or_else(|| {
            RegisterError::Decode("successful response carries no registration info".to_string())
        })?;
        Ok(serde_json::from_value(info)?)
    }
}

/// Where the registered notebook lives in the WIPP UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationInfo {
    pub url: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
}

impl RegistrationInfo {
    /// `url` and `id` concatenated verbatim; the service returns `url` with
    /// its trailing separator.
    pub fn target_url(&self) -> String {
        format!("{}{}", self.url, self.id)
    }
}

/// Body of a non-200 response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// Result of one registration attempt, produced exactly once per dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Success { url: String, id: String },
    Failure { message: String },
}

impl RegistrationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RegistrationOutcome::Success { .. })
    }

    /// Catalog location to open, for successful outcomes only.
    pub fn target_url(&self) -> Option<String> {
        match self {
            RegistrationOutcome::Success { url, id } => Some(format!("{}{}", url, id)),
            RegistrationOutcome::Failure { .. } => None,
        }
    }
}

impl From<RegistrationInfo> for RegistrationOutcome {
    fn from(info: RegistrationInfo) -> Self {
        RegistrationOutcome::Success {
            url: info.url,
            id: info.id,
        }
    }
}

// WIPP ids are strings, but a numeric id should not turn a successful
// registration into a decode failure.
fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(f) => f.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_shape() {
        let envelope: ResponseEnvelope = serde_json::from_str(
            r#"{"code": 200, "info": {"url": "http://wipp/x/", "id": "7"}}"#,
        )
        .unwrap();
        assert_eq!(envelope.code, 200);
        assert_eq!(envelope.error, None);
        let info = envelope.into_info().unwrap();
        assert_eq!(info.target_url(), "http://wipp/x/7");
    }

    #[test]
    fn test_partial_info_does_not_hide_error() {
        for body in [
            r#"{"code": 500, "error": "disk full", "info": {}}"#,
            r#"{"code": 500, "error": "disk full", "info": {"url": "http://wipp/", "id": null}}"#,
        ] {
            let envelope: ResponseEnvelope = serde_json::from_str(body).unwrap();
            assert_eq!(envelope.code, 500);
            assert_eq!(envelope.error.as_deref(), Some("disk full"));
            assert!(matches!(envelope.into_info(), Err(RegisterError::Decode(_))));
        }
    }

    #[test]
    fn test_null_info_is_absent() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"code": 200, "info": null}"#).unwrap();
        assert!(envelope.info.is_none());
        assert!(matches!(envelope.into_info(), Err(RegisterError::Decode(_))));
    }

    #[test]
    fn test_envelope_rejection_without_info() {
        let envelope: ResponseEnvelope =
            serde_json::from_str(r#"{"code": 500, "error": "disk full"}"#).unwrap();
        assert_eq!(envelope.error.as_deref(), Some("disk full"));
        assert!(envelope.info.is_none());
    }

    #[test]
    fn test_numeric_id_accepted() {
        let info: RegistrationInfo =
            serde_json::from_str(r#"{"url": "https://wipp.example/dataset/", "id": 42}"#).unwrap();
        assert_eq!(info.id, "42");
    }

    #[test]
    fn test_envelope_requires_code() {
        let result: std::result::Result<ResponseEnvelope, _> = serde_json::from_str(r#"{"error": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_outcome_target_url() {
        let outcome = RegistrationOutcome::from(RegistrationInfo {
            url: "https://wipp.example/dataset/".to_string(),
            id: "42".to_string(),
        });
        assert!(outcome.is_success());
        assert_eq!(
            outcome.target_url().as_deref(),
            Some("https://wipp.example/dataset/42")
        );

        let failure = RegistrationOutcome::Failure {
            message: "disk full".to_string(),
        };
        assert_eq!(failure.target_url(), None);
    }
}
