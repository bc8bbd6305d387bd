//! Conditional rendering rules of `FormView`.

mod common;

use common::{pdf, reply, server_error, ScriptedService};
use latex_resume_client::view::{self, FormView};
use latex_resume_client::{Endpoint, FormSession};

#[test]
fn fresh_form_shows_only_the_inputs() {
    let session = FormSession::new(ScriptedService::default());
    let v = FormView::from_session(&session);

    assert_eq!(v.title, view::TITLE);
    assert_eq!(v.file_name, None);
    assert_eq!(v.submit_label, view::SUBMIT_LABEL);
    assert!(v.submit_enabled);
    assert_eq!(v.wait_note, None);
    assert_eq!(v.error, None);
    assert!(v.follow_up.is_none());
    assert!(v.result.is_none());
    assert!(v.template_log.is_none());
}

#[tokio::test]
async fn validation_error_is_shown() {
    let mut session = FormSession::new(ScriptedService::default());
    let _ = session.submit_upload().await;

    let v = FormView::from_session(&session);
    assert_eq!(v.error, Some("Please select a file."));
}

#[tokio::test]
async fn follow_up_request_shows_prompt_and_question() {
    let mut session = FormSession::new(ScriptedService::new([reply(
        "Please provide your GitHub link",
        "Jane",
    )]));
    session.select_file(pdf());
    session.set_template("A");
    session.submit_upload().await.unwrap();
    session.set_follow_up("github.com/jane");

    let v = FormView::from_session(&session);

    let panel = v.follow_up.expect("follow-up panel shown");
    assert_eq!(panel.heading, view::FOLLOW_UP_HEADING);
    assert_eq!(panel.input, "github.com/jane");
    assert_eq!(panel.button_label, view::FOLLOW_UP_LABEL);
    assert!(panel.button_enabled);
    assert_eq!(
        v.result.map(|r| r.text),
        Some("Please provide your GitHub link")
    );
    assert_eq!(v.file_name, Some("cv.pdf"));
}

#[tokio::test]
async fn final_result_and_log_are_shown() {
    let mut session = FormSession::new(ScriptedService::new([
        reply("\\documentclass{article}", "Jane"),
        reply("\\documentclass{report}", "Jane"),
    ]));
    session.select_file(pdf());
    session.set_template("A");
    session.submit_upload().await.unwrap();
    session.set_template("B");
    session.submit_upload().await.unwrap();

    let v = FormView::from_session(&session);

    assert!(v.follow_up.is_none());
    let result = v.result.expect("result panel shown");
    assert_eq!(result.heading, view::RESULT_HEADING);
    assert_eq!(result.text, "\\documentclass{report}");
    assert_eq!(result.copy_label, view::COPY_LABEL);
    let log = v.template_log.expect("log shown");
    assert_eq!(log.heading, view::LOG_HEADING);
    assert_eq!(log.entries, ["A", "B"]);
}

#[tokio::test]
async fn request_failure_keeps_previous_result_visible() {
    let mut session = FormSession::new(ScriptedService::new([
        reply("\\documentclass{article}", "Jane"),
        server_error(Endpoint::Upload),
    ]));
    session.select_file(pdf());
    session.set_template("A");
    session.submit_upload().await.unwrap();
    let _ = session.submit_upload().await;

    let v = FormView::from_session(&session);

    assert_eq!(v.error, Some("Error uploading file or extracting data."));
    assert_eq!(v.result.map(|r| r.text), Some("\\documentclass{article}"));
    assert!(v.submit_enabled);
}

#[tokio::test]
async fn empty_result_shows_no_result_panel() {
    let mut session = FormSession::new(ScriptedService::new([reply("", "Jane")]));
    session.select_file(pdf());
    session.set_template("A");
    session.submit_upload().await.unwrap();

    let v = FormView::from_session(&session);

    assert!(v.result.is_none());
    assert!(v.follow_up.is_none());
    assert_eq!(v.template_log.map(|log| log.entries.len()), Some(1));
}
