//! `reqwest`-backed [`TransformService`].
//!
//! Every failure is mapped onto [`ClientError`] with the endpoint attached so
//! the log line says which call broke. Status codes are checked before the
//! body is parsed; the first part of an error body is kept for diagnostics.

use super::{Endpoint, FollowUpRequest, TransformService};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::input::SelectedFile;
use crate::response::ExtractedData;
use reqwest::multipart::{Form, Part};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Longest error-body excerpt kept in [`ClientError::ServerStatus`].
const ERROR_BODY_LIMIT: usize = 512;

/// HTTP client for the transformation service.
#[derive(Debug, Clone)]
pub struct HttpService {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpService {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<ExtractedData, ClientError> {
        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::ServerStatus {
                endpoint,
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.map_transport(endpoint, e))?;
        let data = parse_body(endpoint, &bytes)?;

        info!(
            "{} answered in {}ms ({} bytes)",
            endpoint,
            start.elapsed().as_millis(),
            bytes.len()
        );
        Ok(data)
    }

    fn map_transport(&self, endpoint: Endpoint, e: reqwest::Error) -> ClientError {
        match self.config.request_timeout_secs {
            Some(secs) if e.is_timeout() => ClientError::Timeout { endpoint, secs },
            _ => ClientError::Transport {
                endpoint,
                reason: e.to_string(),
            },
        }
    }
}

impl TransformService for HttpService {
    async fn upload(
        &self,
        file: &SelectedFile,
        template: &str,
    ) -> Result<ExtractedData, ClientError> {
        let endpoint = Endpoint::Upload;
        let url = self.config.endpoint_url(endpoint.path());
        info!("Uploading {} ({} bytes) to {}", file.name(), file.len(), url);

        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime())
            .map_err(|e| ClientError::Transport {
                endpoint,
                reason: format!("invalid MIME type '{}': {e}", file.mime()),
            })?;
        let form = Form::new()
            .part("file", part)
            .text("template", template.to_string());

        self.send(endpoint, self.http.post(&url).multipart(form)).await
    }

    async fn follow_up(&self, request: &FollowUpRequest<'_>) -> Result<ExtractedData, ClientError> {
        let endpoint = Endpoint::FollowUp;
        let url = self.config.endpoint_url(endpoint.path());
        debug!(
            "Sending follow-up ({} chars, pdf_text: {}) to {}",
            request.follow_up.len(),
            request.pdf_text.is_some(),
            url
        );

        self.send(endpoint, self.http.post(&url).json(request)).await
    }
}

/// Parse a 2xx body. Anything other than a JSON object is a failure.
pub(crate) fn parse_body(endpoint: Endpoint, bytes: &[u8]) -> Result<ExtractedData, ClientError> {
    let value: serde_json::Value =
        serde_json::from_slice(bytes).map_err(|e| ClientError::InvalidResponse {
            endpoint,
            reason: e.to_string(),
        })?;
    if !value.is_object() {
        return Err(ClientError::InvalidResponse {
            endpoint,
            reason: "expected a JSON object".into(),
        });
    }
    serde_json::from_value(value).map_err(|e| ClientError::InvalidResponse {
        endpoint,
        reason: e.to_string(),
    })
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\u{2026}", &s[..end])
}
