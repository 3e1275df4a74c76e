// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Talking to the notebook server's WIPP extension.
//!
//! [`RegistrationClient`] owns the request/response contract; the actual HTTP
//! call and the server settings are capabilities behind [`Transport`] and
//! [`SettingsResolver`].

#[cfg(feature = "http-transport")]
mod http_transport;
mod registration_client;

#[cfg(feature = "http-transport")]
pub use http_transport::ReqwestTransport;
pub use registration_client::{RegistrationClient, REGISTER_PATH};

use async_trait::async_trait;
use wipp_config::WippConfig;

use crate::error::Result;

/// Resolved notebook-server connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub base_url: String,
    /// Sent as `Authorization: token <token>`
    pub token: Option<String>,
    pub extra_headers: Vec<(String, String)>,
}

impl ServerSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            extra_headers: Vec::new(),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// All headers to attach, authorization first.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(self.extra_headers.len() + 1);
        if let Some(token) = &self.token {
            headers.push(("Authorization".to_string(), format!("token {}", token)));
        }
        headers.extend(self.extra_headers.iter().cloned());
        headers
    }
}

/// Supplies [`ServerSettings`] at the moment a request is made.
pub trait SettingsResolver: Send + Sync {
    fn resolve_settings(&self) -> ServerSettings;
}

/// Always resolves to the same settings.
#[derive(Debug, Clone)]
pub struct StaticSettings(pub ServerSettings);

impl SettingsResolver for StaticSettings {
    fn resolve_settings(&self) -> ServerSettings {
        self.0.clone()
    }
}

/// Settings taken from the `[server]` section of a [`WippConfig`].
#[derive(Debug, Clone)]
pub struct ConfigSettingsResolver {
    settings: ServerSettings,
}

impl ConfigSettingsResolver {
    pub fn new(config: &WippConfig) -> Self {
        let mut settings = ServerSettings::new(config.server.base_url.clone());
        settings.token = config.server.token.clone();
        Self { settings }
    }
}

impl SettingsResolver for ConfigSettingsResolver {
    fn resolve_settings(&self) -> ServerSettings {
        self.settings.clone()
    }
}

/// Raw reply: any HTTP status, body untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Lossy UTF-8 view of the body, for diagnostics.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs one JSON POST.
///
/// Only failures to complete the exchange are `Err`; every HTTP status,
/// including 4xx/5xx, comes back as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(
        &self,
        url: &str,
        body: &serde_json::Value,
        settings: &ServerSettings,
    ) -> Result<RawResponse>;
}
