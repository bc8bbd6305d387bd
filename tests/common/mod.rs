//! Shared helpers for the integration tests.

#![allow(dead_code)]

use latex_resume_client::{
    ClientError, Clipboard, Endpoint, ExtractedData, FollowUpRequest, Phase, SelectedFile,
    TransformService,
};
use std::collections::VecDeque;
use std::sync::Mutex;
use tokio::sync::watch;

/// Capture library logs when a test runs with `--nocapture`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

pub fn pdf() -> SelectedFile {
    SelectedFile::from_bytes("cv.pdf", b"%PDF-1.7 fake cv".to_vec())
}

pub fn reply(result: &str, pdf_text: &str) -> Result<ExtractedData, ClientError> {
    Ok(ExtractedData {
        result: Some(result.to_string()),
        pdf_text: Some(pdf_text.to_string()),
        ..Default::default()
    })
}

pub fn server_error(endpoint: Endpoint) -> Result<ExtractedData, ClientError> {
    Err(ClientError::ServerStatus {
        endpoint,
        status: 500,
        body: "Internal Server Error".into(),
    })
}

/// What the scripted service was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Upload {
        file_name: String,
        bytes: Vec<u8>,
        template: String,
    },
    FollowUp(serde_json::Value),
}

/// A [`TransformService`] that replays queued responses and records requests.
#[derive(Default)]
pub struct ScriptedService {
    responses: Mutex<VecDeque<Result<ExtractedData, ClientError>>>,
    calls: Mutex<Vec<Call>>,
    observer: Mutex<Option<watch::Receiver<Phase>>>,
    observed: Mutex<Vec<Phase>>,
}

impl ScriptedService {
    pub fn new(responses: impl IntoIterator<Item = Result<ExtractedData, ClientError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            ..Default::default()
        }
    }

    /// Record the session's phase at the moment each request is issued.
    pub fn observe(&self, rx: watch::Receiver<Phase>) {
        *self.observer.lock().unwrap() = Some(rx);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn observed(&self) -> Vec<Phase> {
        self.observed.lock().unwrap().clone()
    }

    fn next(&self, call: Call) -> Result<ExtractedData, ClientError> {
        if let Some(rx) = self.observer.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(*rx.borrow());
        }
        self.calls.lock().unwrap().push(call);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: no scripted response left")
    }
}

impl TransformService for ScriptedService {
    async fn upload(
        &self,
        file: &SelectedFile,
        template: &str,
    ) -> Result<ExtractedData, ClientError> {
        self.next(Call::Upload {
            file_name: file.name().to_string(),
            bytes: file.bytes().to_vec(),
            template: template.to_string(),
        })
    }

    async fn follow_up(&self, request: &FollowUpRequest<'_>) -> Result<ExtractedData, ClientError> {
        let body = serde_json::to_value(request).expect("follow-up body serialises");
        self.next(Call::FollowUp(body))
    }
}

/// In-memory clipboard.
#[derive(Default)]
pub struct MemoryClipboard {
    pub contents: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClientError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
