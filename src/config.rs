//! Configuration for the HTTP transformation service client.
//!
//! All connection behaviour is controlled through [`ClientConfig`], built via
//! its [`ClientConfigBuilder`]. Callers set only what they care about and rely
//! on the documented defaults for the rest.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};

/// Host of the public transformation service.
pub const DEFAULT_BASE_URL: &str = "https://latexresumecreator.onrender.com";

/// Configuration for [`crate::service::HttpService`].
///
/// # Example
/// ```rust
/// use latex_resume_client::ClientConfig;
///
/// let config = ClientConfig::builder()
///     .base_url("http://127.0.0.1:8000/")
///     .request_timeout_secs(600)
///     .build()
///     .unwrap();
/// assert_eq!(config.base_url, "http://127.0.0.1:8000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme and host the `/upload` and `/followup` paths are appended to.
    /// Stored without a trailing slash. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Whole-request timeout in seconds. Default: `None` (wait indefinitely).
    ///
    /// The service routinely needs several minutes per document, so no
    /// deadline is imposed unless the caller asks for one.
    pub request_timeout_secs: Option<u64>,

    /// TCP/TLS connect timeout in seconds. Default: 30.
    pub connect_timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
            connect_timeout_secs: 30,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Create a new builder for `ClientConfig`.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL for an endpoint path such as `/upload`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Builder for [`ClientConfig`].
#[derive(Debug)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim().trim_end_matches('/').to_string();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn connect_timeout_secs(mut self, secs: u64) -> Self {
        self.config.connect_timeout_secs = secs.max(1);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ClientConfig, ClientError> {
        let c = &self.config;
        let parsed = reqwest::Url::parse(&c.base_url).map_err(|e| {
            ClientError::InvalidConfig(format!("base URL '{}' is not a valid URL: {e}", c.base_url))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidConfig(format!(
                "base URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "request timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_public_service_without_timeout() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(
            config.endpoint_url("/upload"),
            "https://latexresumecreator.onrender.com/upload"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let config = ClientConfig::builder()
            .base_url("http://localhost:5000//")
            .build()
            .unwrap();
        assert_eq!(config.endpoint_url("/followup"), "http://localhost:5000/followup");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let err = ClientConfig::builder()
            .base_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("http or https"), "got: {err}");
    }

    #[test]
    fn rejects_garbage_url() {
        assert!(ClientConfig::builder().base_url("not a url").build().is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(ClientConfig::builder()
            .request_timeout_secs(0)
            .build()
            .is_err());
    }
}
