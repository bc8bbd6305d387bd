//! # latex-resume-client
//!
//! Send a PDF and a LaTeX template to a remote transformation service, answer
//! its follow-up question if it has one, and collect the modified template.
//!
//! ## Flow Overview
//!
//! ```text
//! PDF + template
//!  │
//!  ├─ 1. Select   load the PDF (magic-byte checked) and the template text
//!  ├─ 2. Upload   POST /upload (multipart), may take several minutes
//!  ├─ 3. Inspect  result contains "please provide"?  → await follow-up
//!  ├─ 4. Answer   POST /followup (JSON), one round only
//!  └─ 5. Output   display / write / copy the result; template logged
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use latex_resume_client::{ClientConfig, FormSession, HttpService, SelectedFile};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = HttpService::new(ClientConfig::default())?;
//!     let mut session = FormSession::new(service);
//!
//!     session.select_file(SelectedFile::from_path("cv.pdf").await?);
//!     session.set_template(std::fs::read_to_string("resume.tex")?);
//!
//!     if session.submit_upload().await? {
//!         session.set_follow_up("https://github.com/jane-doe");
//!         session.submit_follow_up().await?;
//!     }
//!     println!("{}", session.state().result().unwrap_or_default());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `latex-resume` binary (clap + anyhow + tracing-subscriber + indicatif + arboard) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! latex-resume-client = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod input;
pub mod response;
pub mod service;
pub mod session;
pub mod view;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ClientConfig, ClientConfigBuilder, DEFAULT_BASE_URL};
pub use error::{ClientError, SessionError, ValidationError};
pub use input::SelectedFile;
pub use response::ExtractedData;
pub use service::{Endpoint, FollowUpRequest, HttpService, TransformService};
pub use session::{Clipboard, FormSession, FormState, Phase, TemplateLog};
pub use view::FormView;
