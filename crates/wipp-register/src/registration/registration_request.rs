// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;
use wipp_config::RegistrationConfig;

use crate::error::{RegisterError, Result};

/// A request to register one notebook in WIPP.
///
/// Built once per user action and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    path: String,
    name: String,
    description: String,
    open_in_target: bool,
}

/// The part of a [`RegistrationRequest`] that goes over the wire.
///
/// `open_in_target` is dialog policy and deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationBody<'a> {
    pub path: &'a str,
    pub name: &'a str,
    pub description: &'a str,
}

impl RegistrationRequest {
    /// Create a new registration request.
    ///
    /// # Arguments
    /// * `path` - Server-side path of the notebook (e.g. `work/analysis.ipynb`)
    /// * `name` - Display name in WIPP
    /// * `description` - Free text, may be empty
    /// * `open_in_target` - Open the registered notebook in WIPP on success
    ///
    /// # Errors
    /// `RegisterError::InvalidRequest` if `path` or `name` is blank.
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        open_in_target: bool,
    ) -> Result<Self> {
        let path = path.into();
        let name = name.into();
        if path.trim().is_empty() {
            return Err(RegisterError::InvalidRequest(
                "notebook path must not be empty".to_string(),
            ));
        }
        if name.trim().is_empty() {
            return Err(RegisterError::InvalidRequest(
                "notebook name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            path,
            name,
            description: description.into(),
            open_in_target,
        })
    }

    /// Like [`new`](Self::new), with `open_in_target` taken from configuration.
    pub fn with_config_defaults(
        path: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        config: &RegistrationConfig,
    ) -> Result<Self> {
        Self::new(path, name, description, config.open_in_wipp)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn open_in_target(&self) -> bool {
        self.open_in_target
    }

    pub fn wire_body(&self) -> RegistrationBody<'_> {
        RegistrationBody {
            path: &self.path,
            name: &self.name,
            description: &self.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_blank_fields() {
        assert!(matches!(
            RegistrationRequest::new("", "demo", "", false),
            Err(RegisterError::InvalidRequest(_))
        ));
        assert!(matches!(
            RegistrationRequest::new("/a/b.ipynb", "   ", "", false),
            Err(RegisterError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_empty_description_allowed() {
        let request = RegistrationRequest::new("/a/b.ipynb", "demo", "", true).unwrap();
        assert_eq!(request.description(), "");
        assert!(request.open_in_target());
    }

    #[test]
    fn test_open_flag_from_config() {
        let mut config = RegistrationConfig::default();
        let request =
            RegistrationRequest::with_config_defaults("/a/b.ipynb", "demo", "", &config).unwrap();
        assert!(!request.open_in_target());

        config.open_in_wipp = true;
        let request =
            RegistrationRequest::with_config_defaults("/a/b.ipynb", "demo", "", &config).unwrap();
        assert!(request.open_in_target());
    }

    #[test]
    fn test_wire_body_omits_open_flag() {
        let request = RegistrationRequest::new("/a/b.ipynb", "demo", "notes", true).unwrap();
        let json = serde_json::to_value(request.wire_body()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "path": "/a/b.ipynb",
                "name": "demo",
                "description": "notes"
            })
        );
    }
}
