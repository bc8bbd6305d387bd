//! Error types for the latex-resume-client library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`ValidationError`] (**local**): the form is incomplete (no file, blank
//!   template, blank follow-up). Detected before any request is issued; the
//!   `Display` text is exactly what the user is shown.
//!
//! * [`ClientError`] (**transport / input**): a request could not be built,
//!   sent, or understood, or a local file could not be loaded. The details
//!   are meant for logs, not for the user.
//!
//! * [`SessionError`] is what the form controllers return. It wraps the two
//!   above and adds the guard outcomes (`Busy`, `FollowUpNotRequested`).
//!   [`SessionError::user_message`] collapses every request failure into the
//!   generic string for its endpoint.

use crate::service::Endpoint;
use std::path::PathBuf;
use thiserror::Error;

/// User-visible message for any failed `/upload` request.
pub const UPLOAD_FAILED_MESSAGE: &str = "Error uploading file or extracting data.";

/// User-visible message for any failed `/followup` request.
pub const FOLLOW_UP_FAILED_MESSAGE: &str = "Error submitting follow-up details.";

/// A form field failed local validation. No request was issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No PDF has been selected.
    #[error("Please select a file.")]
    MissingFile,

    /// The template is empty or whitespace only.
    #[error("Please provide a LaTeX template.")]
    BlankTemplate,

    /// The follow-up answer is empty or whitespace only.
    #[error("Please provide the required details.")]
    BlankFollowUp,
}

/// Errors raised while loading input or talking to the transformation service.
#[derive(Debug, Error)]
pub enum ClientError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// Any other I/O failure while reading a local file.
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── HTTP errors ───────────────────────────────────────────────────────
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClientBuild(String),

    /// Connection, TLS, or body transfer failed.
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: Endpoint, reason: String },

    /// The configured request timeout elapsed.
    #[error("Request to {endpoint} timed out after {secs}s\nIncrease --timeout or omit it.")]
    Timeout { endpoint: Endpoint, secs: u64 },

    /// The service answered with a non-success status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    ServerStatus {
        endpoint: Endpoint,
        status: u16,
        body: String,
    },

    /// The service answered 2xx but the body is not a JSON object of the expected shape.
    #[error("{endpoint} returned an unreadable response: {reason}")]
    InvalidResponse { endpoint: Endpoint, reason: String },

    // ── Local surfaces ────────────────────────────────────────────────────
    /// Writing to the system clipboard failed.
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Outcome of a rejected or failed form submission.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A field failed local validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A request is already in flight; submit controls are disabled.
    #[error("A request is already in progress")]
    Busy,

    /// The follow-up controller is only enabled after the service asked for details.
    #[error("The service has not asked for additional details")]
    FollowUpNotRequested,

    /// The `/upload` request failed.
    #[error("Upload failed: {0}")]
    Upload(#[source] ClientError),

    /// The `/followup` request failed.
    #[error("Follow-up failed: {0}")]
    FollowUp(#[source] ClientError),
}

impl SessionError {
    /// The message a front-end shows for this error.
    ///
    /// Network failures and error responses are not distinguished here; the
    /// underlying cause is only logged.
    pub fn user_message(&self) -> String {
        match self {
            SessionError::Validation(v) => v.to_string(),
            SessionError::Upload(_) => UPLOAD_FAILED_MESSAGE.to_string(),
            SessionError::FollowUp(_) => FOLLOW_UP_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        assert_eq!(ValidationError::MissingFile.to_string(), "Please select a file.");
        assert_eq!(
            ValidationError::BlankTemplate.to_string(),
            "Please provide a LaTeX template."
        );
        assert_eq!(
            ValidationError::BlankFollowUp.to_string(),
            "Please provide the required details."
        );
    }

    #[test]
    fn request_failures_collapse_to_generic_message() {
        let e = SessionError::Upload(ClientError::ServerStatus {
            endpoint: Endpoint::Upload,
            status: 502,
            body: "bad gateway".into(),
        });
        assert_eq!(e.user_message(), UPLOAD_FAILED_MESSAGE);
        assert!(e.to_string().contains("502"), "got: {e}");

        let e = SessionError::FollowUp(ClientError::Transport {
            endpoint: Endpoint::FollowUp,
            reason: "connection refused".into(),
        });
        assert_eq!(e.user_message(), FOLLOW_UP_FAILED_MESSAGE);
    }

    #[test]
    fn timeout_display() {
        let e = ClientError::Timeout {
            endpoint: Endpoint::Upload,
            secs: 300,
        };
        assert!(e.to_string().contains("/upload"));
        assert!(e.to_string().contains("300s"));
    }

    #[test]
    fn validation_converts_into_session_error() {
        let e: SessionError = ValidationError::MissingFile.into();
        assert_eq!(e.user_message(), "Please select a file.");
    }
}
