// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use tracing::debug;
use wipp_config::{join_url, WippConfig, DEFAULT_ERROR_MESSAGE};

use super::{ConfigSettingsResolver, ServerSettings, SettingsResolver, Transport};
use crate::error::{RegisterError, Result};
use crate::host::{DiagnosticEvent, DiagnosticSink, NullDiagnostics};
use crate::registration::{
    ErrorBody, RegistrationInfo, RegistrationOutcome, RegistrationRequest, ResponseEnvelope,
};

/// Path of the registration handler, relative to the extension endpoint base.
pub const REGISTER_PATH: &str = "register";

const HTTP_OK: u16 = 200;

/// Issues registration requests and classifies the replies.
///
/// Stateless between calls: every [`submit`](Self::submit) is an independent
/// POST, with settings resolved at call time.
#[derive(Clone)]
pub struct RegistrationClient {
    transport: Arc<dyn Transport>,
    settings: Arc<dyn SettingsResolver>,
    diagnostics: Arc<dyn DiagnosticSink>,
    success_code: i64,
    default_message: String,
}

impl std::fmt::Debug for RegistrationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationClient")
            .field("success_code", &self.success_code)
            .field("default_message", &self.default_message)
            .finish_non_exhaustive()
    }
}

impl RegistrationClient {
    pub fn new(transport: Arc<dyn Transport>, settings: Arc<dyn SettingsResolver>) -> Self {
        Self {
            transport,
            settings,
            diagnostics: Arc::new(NullDiagnostics),
            success_code: 200,
            default_message: DEFAULT_ERROR_MESSAGE.to_string(),
        }
    }

    /// Client wired from a loaded configuration, using the reqwest transport.
    #[cfg(feature = "http-transport")]
    pub fn from_config(config: &WippConfig) -> Result<Self> {
        let transport = super::ReqwestTransport::from_config(config)?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(ConfigSettingsResolver::new(config)),
        )
        .with_success_code(config.registration.success_code)
        .with_default_message(config.registration.default_error_message.clone()))
    }

    /// Like [`from_config`](Self::from_config), but with a caller-supplied transport.
    pub fn from_config_with_transport(config: &WippConfig, transport: Arc<dyn Transport>) -> Self {
        Self::new(transport, Arc::new(ConfigSettingsResolver::new(config)))
            .with_success_code(config.registration.success_code)
            .with_default_message(config.registration.default_error_message.clone())
    }

    /// Envelope `code` treated as success.
    pub fn with_success_code(mut self, code: i64) -> Self {
        self.success_code = code;
        self
    }

    pub fn with_default_message(mut self, message: impl Into<String>) -> Self {
        self.default_message = message.into();
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn settings(&self) -> ServerSettings {
        self.settings.resolve_settings()
    }

    pub fn default_message(&self) -> &str {
        &self.default_message
    }

    pub fn success_code(&self) -> i64 {
        self.success_code
    }

    /// Register `request` and always produce an outcome.
    ///
    /// Any failure becomes [`RegistrationOutcome::Failure`] carrying the
    /// server's message when it supplied one, otherwise the default message.
    pub async fn submit(
        &self,
        request: &RegistrationRequest,
        endpoint_base: &str,
    ) -> RegistrationOutcome {
        let settings = self.settings.resolve_settings();
        self.submit_with_settings(request, endpoint_base, &settings)
            .await
    }

    /// [`submit`](Self::submit) against an already resolved settings snapshot.
    pub async fn submit_with_settings(
        &self,
        request: &RegistrationRequest,
        endpoint_base: &str,
        settings: &ServerSettings,
    ) -> RegistrationOutcome {
        match self
            .try_submit_with_settings(request, endpoint_base, settings)
            .await
        {
            Ok(info) => info.into(),
            Err(err) => {
                debug!(error = %err, "Registration failed");
                RegistrationOutcome::Failure {
                    message: err.user_message(&self.default_message),
                }
            }
        }
    }

    /// Register `request`, keeping the failure classification.
    ///
    /// `endpoint_base` is the extension's base URL; the request goes to
    /// `endpoint_base` joined with [`REGISTER_PATH`].
    pub async fn try_submit(
        &self,
        request: &RegistrationRequest,
        endpoint_base: &str,
    ) -> Result<RegistrationInfo> {
        let settings = self.settings.resolve_settings();
        self.try_submit_with_settings(request, endpoint_base, &settings)
            .await
    }

    /// [`try_submit`](Self::try_submit) against an already resolved settings
    /// snapshot; the resolver is not consulted.
    pub async fn try_submit_with_settings(
        &self,
        request: &RegistrationRequest,
        endpoint_base: &str,
        settings: &ServerSettings,
    ) -> Result<RegistrationInfo> {
        let url = join_url(endpoint_base, REGISTER_PATH);
        let body = serde_json::to_value(request.wire_body())?;

        self.diagnostics
            .record(DiagnosticEvent::RequestIssued { url: url.clone() });

        let response = match self.transport.request(&url, &body, settings).await {
            Ok(response) => response,
            Err(err) => {
                self.diagnostics.record(DiagnosticEvent::TransportFailed {
                    url: url.clone(),
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        self.diagnostics.record(DiagnosticEvent::ResponseReceived {
            url,
            status: response.status,
            body: response.body_text(),
        });

        if response.status != HTTP_OK {
            // Error bodies are best effort; an unreadable one still yields HttpStatus.
            let message = serde_json::from_slice::<ErrorBody>(&response.body)
                .ok()
                .and_then(|b| b.message);
            return Err(RegisterError::HttpStatus {
                status: response.status,
                message,
            });
        }

        let envelope: ResponseEnvelope = serde_json::from_slice(&response.body)?;
        if envelope.code != self.success_code {
            return Err(RegisterError::ServerRejection {
                code: envelope.code,
                message: envelope.error,
            });
        }

        envelope.into_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{RawResponse, StaticSettings};
    use async_trait::async_trait;
    use parking_lot::Mutex;

    /// Replies with a canned response and remembers what it was asked.
    struct CannedTransport {
        reply: Result<RawResponse>,
        seen: Mutex<Vec<(String, serde_json::Value, ServerSettings)>>,
    }

    impl CannedTransport {
        fn new(reply: Result<RawResponse>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Transport for CannedTransport {
        async fn request(
            &self,
            url: &str,
            body: &serde_json::Value,
            settings: &ServerSettings,
        ) -> Result<RawResponse> {
            self.seen
                .lock()
                .push((url.to_string(), body.clone(), settings.clone()));
            self.reply.clone()
        }
    }

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<DiagnosticEvent>>);

    impl DiagnosticSink for RecordingSink {
        fn record(&self, event: DiagnosticEvent) {
            self.0.lock().push(event);
        }
    }

    fn client(transport: Arc<CannedTransport>) -> RegistrationClient {
        RegistrationClient::new(
            transport,
            Arc::new(StaticSettings(
                ServerSettings::new("http://localhost:8888/").with_token("t0k"),
            )),
        )
    }

    fn request() -> RegistrationRequest {
        RegistrationRequest::new("/a/b.ipynb", "demo", "", true).unwrap()
    }

    #[tokio::test]
    async fn test_success_posts_wire_body() {
        let transport = CannedTransport::new(Ok(RawResponse::new(
            200,
            r#"{"code":200,"info":{"url":"http://wipp/x/","id":"7"}}"#,
        )));
        let info = client(transport.clone())
            .try_submit(&request(), "http://localhost:8888/wipp")
            .await
            .unwrap();
        assert_eq!(info.target_url(), "http://wipp/x/7");

        let seen = transport.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "http://localhost:8888/wipp/register");
        assert_eq!(
            seen[0].1,
            serde_json::json!({"path": "/a/b.ipynb", "name": "demo", "description": ""})
        );
        assert_eq!(seen[0].2.token.as_deref(), Some("t0k"));
    }

    #[tokio::test]
    async fn test_embedded_code_mismatch_is_rejection() {
        let transport = CannedTransport::new(Ok(RawResponse::new(
            200,
            r#"{"code":500,"error":"disk full"}"#,
        )));
        let err = client(transport)
            .try_submit(&request(), "http://localhost:8888/wipp/")
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RegisterError::ServerRejection {
                code: 500,
                message: Some("disk full".to_string())
            }
        );
    }

    #[tokio::test]
    async fn test_custom_success_code() {
        let transport = CannedTransport::new(Ok(RawResponse::new(
            200,
            r#"{"code":0,"info":{"url":"u/","id":"1"}}"#,
        )));
        let outcome = client(transport)
            .with_success_code(0)
            .submit(&request(), "http://h/wipp")
            .await;
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_http_error_uses_message_or_default() {
        let transport = CannedTransport::new(Ok(RawResponse::new(
            500,
            r#"{"message":"Internal Server Error"}"#,
        )));
        let outcome = client(transport).submit(&request(), "http://h/wipp").await;
        assert_eq!(
            outcome,
            RegistrationOutcome::Failure {
                message: "Internal Server Error".to_string()
            }
        );

        let transport = CannedTransport::new(Ok(RawResponse::new(502, "<html>bad gateway</html>")));
        let outcome = client(transport)
            .with_default_message("try again")
            .submit(&request(), "http://h/wipp")
            .await;
        assert_eq!(
            outcome,
            RegistrationOutcome::Failure {
                message: "try again".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_and_missing_info_default() {
        for body in ["not json", r#"{"code":200}"#] {
            let transport = CannedTransport::new(Ok(RawResponse::new(200, body)));
            let outcome = client(transport).submit(&request(), "http://h/wipp").await;
            assert_eq!(
                outcome,
                RegistrationOutcome::Failure {
                    message: DEFAULT_ERROR_MESSAGE.to_string()
                },
                "{body}"
            );
        }
    }

    #[tokio::test]
    async fn test_transport_failure_reported() {
        let sink = Arc::new(RecordingSink::default());
        let transport = CannedTransport::new(Err(RegisterError::Transport(
            "connection refused".to_string(),
        )));
        let outcome = client(transport)
            .with_diagnostics(sink.clone())
            .submit(&request(), "http://h/wipp")
            .await;
        assert_eq!(
            outcome,
            RegistrationOutcome::Failure {
                message: DEFAULT_ERROR_MESSAGE.to_string()
            }
        );

        let events = sink.0.lock();
        assert_eq!(
            *events,
            vec![
                DiagnosticEvent::RequestIssued {
                    url: "http://h/wipp/register".to_string()
                },
                DiagnosticEvent::TransportFailed {
                    url: "http://h/wipp/register".to_string(),
                    reason: "Transport failed: connection refused".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_rejection_with_partial_info_keeps_server_error() {
        for body in [
            r#"{"code":500,"error":"disk full","info":{}}"#,
            r#"{"code":500,"error":"disk full","info":{"url":"http://wipp/","id":null}}"#,
        ] {
            let transport = CannedTransport::new(Ok(RawResponse::new(200, body)));
            let outcome = client(transport).submit(&request(), "http://h/wipp").await;
            assert_eq!(
                outcome,
                RegistrationOutcome::Failure {
                    message: "disk full".to_string()
                },
                "{body}"
            );
        }
    }

    #[tokio::test]
    async fn test_settings_snapshot_is_used_as_given() {
        let transport = CannedTransport::new(Ok(RawResponse::new(
            200,
            r#"{"code":200,"info":{"url":"u/","id":"1"}}"#,
        )));
        let snapshot = ServerSettings::new("http://other/").with_token("snap");
        let outcome = client(transport.clone())
            .submit_with_settings(&request(), "http://other/wipp", &snapshot)
            .await;
        assert!(outcome.is_success());

        let seen = transport.seen.lock();
        assert_eq!(seen[0].0, "http://other/wipp/register");
        assert_eq!(seen[0].2, snapshot);
    }

    #[test]
    fn test_from_config_with_transport() {
        let mut config = WippConfig::default();
        config.registration.success_code = 201;
        config.registration.default_error_message = "nope".to_string();
        let transport = CannedTransport::new(Ok(RawResponse::new(200, "")));

        let client = RegistrationClient::from_config_with_transport(&config, transport);
        assert_eq!(client.success_code(), 201);
        assert_eq!(client.default_message(), "nope");
        assert_eq!(client.settings().base_url, config.server.base_url);
    }
}
