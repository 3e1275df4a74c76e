// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use wipp_config::WippConfig;

use super::{RawResponse, ServerSettings, Transport};
use crate::error::{RegisterError, Result};

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegisterError::Transport(format!("HTTP client init failed: {e}")))?;
        Ok(Self { client })
    }

    /// Use an existing client, e.g. one shared with other components.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &WippConfig) -> Result<Self> {
        Self::new(Duration::from_secs(config.server.request_timeout_s))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(
        &self,
        url: &str,
        body: &serde_json::Value,
        settings: &ServerSettings,
    ) -> Result<RawResponse> {
        let mut builder = self.client.post(url).json(body);
        for (name, value) in settings.headers() {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        Ok(RawResponse::new(status, bytes.to_vec()))
    }
}
