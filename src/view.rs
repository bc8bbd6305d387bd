//! What a front-end should render for the current form state.
//!
//! [`FormView`] is recomputed after every event; it borrows from the session
//! and carries no state of its own. Panels are `Option`s: `None` means the
//! panel is not shown at all.

use crate::session::FormSession;
use crate::service::TransformService;
use serde::Serialize;

pub const TITLE: &str = "LaTeX Template Modifier";
pub const TEMPLATE_PLACEHOLDER: &str = "Enter your LaTeX template here...";
pub const SUBMIT_LABEL: &str = "Upload and Modify Template";
pub const SUBMIT_BUSY_LABEL: &str = "Processing...";
pub const WAIT_NOTE: &str = "Processing request. Please wait 2-5 minutes...";

pub const FOLLOW_UP_HEADING: &str = "Additional Details Required";
pub const FOLLOW_UP_EXPLANATION: &str = "The system requires further information \
(e.g. missing links or references). Please provide the additional details below.";
pub const FOLLOW_UP_PLACEHOLDER: &str = "Enter additional details here...";
pub const FOLLOW_UP_LABEL: &str = "Submit Additional Details";
pub const FOLLOW_UP_BUSY_LABEL: &str = "Submitting...";

pub const RESULT_HEADING: &str = "Modified LaTeX Template";
pub const COPY_LABEL: &str = "Copy to Clipboard";
pub const COPY_NOTICE: &str = "Modified LaTeX template copied to clipboard!";

pub const LOG_HEADING: &str = "Previously Used Templates";

/// The follow-up prompt, shown while the service is waiting for details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpPanel<'a> {
    pub heading: &'static str,
    pub explanation: &'static str,
    pub placeholder: &'static str,
    pub input: &'a str,
    pub button_label: &'static str,
    pub button_enabled: bool,
}

/// The modified template with its copy action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultPanel<'a> {
    pub heading: &'static str,
    pub text: &'a str,
    pub copy_label: &'static str,
}

/// The list of previously submitted templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogPanel<'a> {
    pub heading: &'static str,
    pub entries: &'a [String],
}

/// Render model for one frame of the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView<'a> {
    pub title: &'static str,
    pub file_name: Option<&'a str>,
    pub template: &'a str,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub wait_note: Option<&'static str>,
    pub error: Option<&'a str>,
    pub follow_up: Option<FollowUpPanel<'a>>,
    pub result: Option<ResultPanel<'a>>,
    pub template_log: Option<LogPanel<'a>>,
}

impl<'a> FormView<'a> {
    pub fn from_session<S: TransformService>(session: &'a FormSession<S>) -> Self {
        let state = session.state();
        let loading = session.is_loading();

        let follow_up = state.follow_up_required().then(|| FollowUpPanel {
            heading: FOLLOW_UP_HEADING,
            explanation: FOLLOW_UP_EXPLANATION,
            placeholder: FOLLOW_UP_PLACEHOLDER,
            input: state.follow_up_input(),
            button_label: if loading { FOLLOW_UP_BUSY_LABEL } else { FOLLOW_UP_LABEL },
            button_enabled: !loading,
        });

        let result = state.result().map(|text| ResultPanel {
            heading: RESULT_HEADING,
            text,
            copy_label: COPY_LABEL,
        });

        let log = state.template_log();
        let template_log = (!log.is_empty()).then(|| LogPanel {
            heading: LOG_HEADING,
            entries: log.as_slice(),
        });

        Self {
            title: TITLE,
            file_name: state.selected_file().map(|f| f.name()),
            template: state.template(),
            submit_label: if loading { SUBMIT_BUSY_LABEL } else { SUBMIT_LABEL },
            submit_enabled: !loading,
            wait_note: loading.then_some(WAIT_NOTE),
            error: Some(state.error()).filter(|e| !e.is_empty()),
            follow_up,
            result,
            template_log,
        }
    }
}
