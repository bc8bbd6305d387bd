//! The remote transformation service, seen from the form.
//!
//! [`TransformService`] is the seam between the form session and the network.
//! [`HttpService`] is the production implementation; tests substitute a
//! scripted one so controller behaviour can be checked without I/O.
//!
//! ## Data Flow
//!
//! ```text
//! FormSession ──upload(file, template)──▶ POST /upload   (multipart)
//!             ──follow_up(request)──────▶ POST /followup (JSON)
//!             ◀──────── ExtractedData ─────────────────┘
//! ```

pub mod http;

use crate::error::ClientError;
use crate::input::SelectedFile;
use crate::response::ExtractedData;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub use http::HttpService;

/// The two service endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Endpoint {
    Upload,
    FollowUp,
}

impl Endpoint {
    /// Path appended to the configured base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Upload => "/upload",
            Endpoint::FollowUp => "/followup",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// JSON body of `POST /followup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpRequest<'a> {
    /// The user's answer to the service's question.
    #[serde(rename = "followUp")]
    pub follow_up: &'a str,

    /// Context returned by the previous response; omitted when it had none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_text: Option<&'a str>,

    /// The template as currently entered.
    pub template: &'a str,
}

/// A transformation backend.
///
/// Implementations must be `Send + Sync`; the returned futures must be `Send`
/// so a session can be driven from a multi-threaded runtime.
pub trait TransformService: Send + Sync {
    /// Submit a PDF and a template. `template` is sent exactly as given.
    fn upload(
        &self,
        file: &SelectedFile,
        template: &str,
    ) -> impl Future<Output = Result<ExtractedData, ClientError>> + Send;

    /// Submit a follow-up answer for the previous response.
    fn follow_up(
        &self,
        request: &FollowUpRequest<'_>,
    ) -> impl Future<Output = Result<ExtractedData, ClientError>> + Send;
}

impl<T: TransformService> TransformService for Arc<T> {
    fn upload(
        &self,
        file: &SelectedFile,
        template: &str,
    ) -> impl Future<Output = Result<ExtractedData, ClientError>> + Send {
        (**self).upload(file, template)
    }

    fn follow_up(
        &self,
        request: &FollowUpRequest<'_>,
    ) -> impl Future<Output = Result<ExtractedData, ClientError>> + Send {
        (**self).follow_up(request)
    }
}
