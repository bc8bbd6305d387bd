//! The form session: state plus the upload and follow-up controllers.
//!
//! A [`FormSession`] owns everything the form knows (selected file, template,
//! follow-up answer, last response, template log and error message) plus the
//! [`TransformService`] it submits to. It is created when a front-end mounts
//! and dropped when it unmounts; nothing outlives it.
//!
//! ## Phases
//!
//! ```text
//!            submit_upload                 result asks for details
//!   Idle ──────────────────▶ Submitting ──────────────────────────▶ AwaitingFollowUp
//!    ▲                          │  ▲                                     │
//!    └──────── otherwise ───────┘  └──────── submit_follow_up ───────────┘
//! ```
//!
//! A follow-up round always settles in `Idle`, whatever the new result says.
//! The current phase is published on a `watch` channel so a front-end can
//! show its wait note while a request is outstanding.
//!
//! ## Loading guard
//!
//! Controllers take `&mut self`, so one session cannot issue two requests at
//! once. The loading flag is still checked on entry and held by an RAII guard.
//! A successful request settles the guard on its new phase; a failed request,
//! or a future dropped mid-flight, restores the phase it started from.

use crate::error::{ClientError, SessionError, ValidationError};
use crate::input::SelectedFile;
use crate::response::ExtractedData;
use crate::service::{Endpoint, FollowUpRequest, TransformService};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// Where the form is in its request cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    /// Nothing in flight, no follow-up pending.
    #[default]
    Idle,
    /// A request to the given endpoint is outstanding.
    Submitting(Endpoint),
    /// The last upload result asked for more details.
    AwaitingFollowUp,
}

impl Phase {
    pub fn is_loading(self) -> bool {
        matches!(self, Phase::Submitting(_))
    }
}

/// Ordered, de-duplicated history of submitted templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateLog {
    entries: Vec<String>,
}

impl TemplateLog {
    /// Append `template` unless an identical string is already present.
    /// Returns `true` when it was added.
    pub fn push_unique(&mut self, template: &str) -> bool {
        if self.entries.iter().any(|t| t == template) {
            return false;
        }
        self.entries.push(template.to_string());
        true
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Destination for the copy action.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError>;
}

/// Everything the form holds between events.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    selected_file: Option<SelectedFile>,
    template: String,
    follow_up_input: String,
    extracted: Option<ExtractedData>,
    follow_up_required: bool,
    template_log: TemplateLog,
    error: String,
}

impl FormState {
    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn follow_up_input(&self) -> &str {
        &self.follow_up_input
    }

    /// The last successful response, if any.
    pub fn extracted(&self) -> Option<&ExtractedData> {
        self.extracted.as_ref()
    }

    /// Shortcut for `extracted().and_then(ExtractedData::result)`.
    pub fn result(&self) -> Option<&str> {
        self.extracted.as_ref().and_then(ExtractedData::result)
    }

    pub fn follow_up_required(&self) -> bool {
        self.follow_up_required
    }

    pub fn template_log(&self) -> &TemplateLog {
        &self.template_log
    }

    /// Current user-visible error; empty when there is none.
    pub fn error(&self) -> &str {
        &self.error
    }

    fn settled_phase(&self) -> Phase {
        if self.follow_up_required {
            Phase::AwaitingFollowUp
        } else {
            Phase::Idle
        }
    }
}

/// Marks a request as outstanding for as long as it lives.
///
/// Dropping the guard publishes exactly one phase: the one passed to
/// [`InFlight::settle`], or the phase from before the request.
struct InFlight<'a> {
    phase: &'a watch::Sender<Phase>,
    next: Phase,
}

impl<'a> InFlight<'a> {
    fn enter(phase: &'a watch::Sender<Phase>, endpoint: Endpoint) -> Self {
        let previous = phase.send_replace(Phase::Submitting(endpoint));
        Self {
            phase,
            next: previous,
        }
    }

    fn settle(mut self, next: Phase) {
        self.next = next;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(self.next);
    }
}

/// A form bound to one transformation service.
pub struct FormSession<S> {
    service: S,
    state: FormState,
    phase: watch::Sender<Phase>,
}

impl<S: TransformService> FormSession<S> {
    pub fn new(service: S) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            service,
            state: FormState::default(),
            phase,
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// True exactly while a request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.phase().is_loading()
    }

    /// Receive every phase change from now on.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    // ── Input events ─────────────────────────────────────────────────────

    /// Take the first file of a picked set. An empty pick changes nothing.
    pub fn select_files(&mut self, files: impl IntoIterator<Item = SelectedFile>) {
        if let Some(file) = files.into_iter().next() {
            self.select_file(file);
        }
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.state.selected_file = Some(file);
    }

    pub fn set_template(&mut self, template: impl Into<String>) {
        self.state.template = template.into();
    }

    pub fn set_follow_up(&mut self, text: impl Into<String>) {
        self.state.follow_up_input = text.into();
    }

    /// Copy the current result to `clipboard`.
    ///
    /// Returns `Ok(true)` when something was copied and the front-end should
    /// show [`crate::view::COPY_NOTICE`]; `Ok(false)` when there is no result.
    pub fn copy_result(&self, clipboard: &mut impl Clipboard) -> Result<bool, ClientError> {
        match self.state.result() {
            Some(result) => {
                clipboard.set_text(result)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ── Controllers ──────────────────────────────────────────────────────

    /// Send the selected PDF and template to `/upload`.
    ///
    /// On success returns whether the service asked for more details.
    pub async fn submit_upload(&mut self) -> Result<bool, SessionError> {
        if self.is_loading() {
            return Err(SessionError::Busy);
        }
        let file = match self.state.selected_file.clone() {
            Some(file) => file,
            None => return Err(self.reject(ValidationError::MissingFile)),
        };
        if self.state.template.trim().is_empty() {
            return Err(self.reject(ValidationError::BlankTemplate));
        }
        let template = self.state.template.clone();

        self.state.error.clear();
        let in_flight = InFlight::enter(&self.phase, Endpoint::Upload);
        let response = self.service.upload(&file, &template).await;

        match response {
            Ok(data) => {
                let follow_up = data.requires_follow_up();
                if follow_up {
                    warn!("Service asked for additional details");
                }
                self.state.extracted = Some(data);
                self.state.template_log.push_unique(&template);
                self.state.follow_up_required = follow_up;
                in_flight.settle(self.state.settled_phase());
                info!(
                    "Upload complete (follow-up required: {}, log size: {})",
                    follow_up,
                    self.state.template_log.len()
                );
                Ok(follow_up)
            }
            Err(e) => {
                drop(in_flight);
                error!("Upload failed: {e}");
                let err = SessionError::Upload(e);
                self.state.error = err.user_message();
                Err(err)
            }
        }
    }

    /// Send the follow-up answer to `/followup`.
    ///
    /// Only enabled while the last upload asked for details. One round only:
    /// afterwards the form is no longer awaiting a follow-up.
    pub async fn submit_follow_up(&mut self) -> Result<(), SessionError> {
        if !self.state.follow_up_required {
            return Err(SessionError::FollowUpNotRequested);
        }
        if self.is_loading() {
            return Err(SessionError::Busy);
        }
        if self.state.follow_up_input.trim().is_empty() {
            return Err(self.reject(ValidationError::BlankFollowUp));
        }

        self.state.error.clear();
        let in_flight = InFlight::enter(&self.phase, Endpoint::FollowUp);
        let request = FollowUpRequest {
            follow_up: &self.state.follow_up_input,
            pdf_text: self.state.extracted.as_ref().and_then(ExtractedData::pdf_text),
            template: &self.state.template,
        };
        let response = self.service.follow_up(&request).await;

        match response {
            Ok(data) => {
                self.state.extracted = Some(data);
                self.state.follow_up_required = false;
                in_flight.settle(self.state.settled_phase());
                info!("Follow-up complete");
                Ok(())
            }
            Err(e) => {
                drop(in_flight);
                error!("Follow-up failed: {e}");
                let err = SessionError::FollowUp(e);
                self.state.error = err.user_message();
                Err(err)
            }
        }
    }

    fn reject(&mut self, reason: ValidationError) -> SessionError {
        self.state.error = reason.to_string();
        reason.into()
    }

    #[cfg(test)]
    pub(crate) fn set_phase(&self, phase: Phase) {
        self.phase.send_replace(phase);
    }
}
