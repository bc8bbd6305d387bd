//! Response record returned by both service endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Marker phrase the service uses when it needs more information.
pub const FOLLOW_UP_MARKER: &str = "please provide";

/// The service's answer to `/upload` or `/followup`.
///
/// Both documented fields are optional: a body without `result` simply has
/// nothing to display. Any additional fields are kept verbatim in `extra` so
/// the record can be written back out unchanged (e.g. `--json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    /// The modified template, or a request for missing details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Text extracted from the uploaded PDF; context for the follow-up round.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_text: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExtractedData {
    /// The result text, if the service returned a non-empty one.
    ///
    /// An empty string means there is nothing to display or copy.
    pub fn result(&self) -> Option<&str> {
        self.result.as_deref().filter(|r| !r.is_empty())
    }

    /// The extracted PDF text, if the service returned it.
    pub fn pdf_text(&self) -> Option<&str> {
        self.pdf_text.as_deref()
    }

    /// Whether the result asks the user for more information.
    ///
    /// Case-insensitive substring match on [`FOLLOW_UP_MARKER`]; `false` when
    /// `result` is absent.
    pub fn requires_follow_up(&self) -> bool {
        self.result
            .as_deref()
            .is_some_and(|r| r.to_lowercase().contains(FOLLOW_UP_MARKER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_result(result: &str) -> ExtractedData {
        ExtractedData {
            result: Some(result.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn detects_follow_up_case_insensitively() {
        assert!(with_result("Please provide your GitHub link").requires_follow_up());
        assert!(with_result("Kindly PLEASE PROVIDE a phone number.").requires_follow_up());
    }

    #[test]
    fn latex_result_needs_no_follow_up() {
        let data = with_result("\\documentclass{article}\n\\begin{document}Hi\\end{document}");
        assert!(!data.requires_follow_up());
    }

    #[test]
    fn missing_result_needs_no_follow_up() {
        assert!(!ExtractedData::default().requires_follow_up());
    }

    #[test]
    fn deserialises_partial_body_and_keeps_extra_fields() {
        let data: ExtractedData =
            serde_json::from_str(r#"{"pdf_text":"Jane Doe","status":"ok"}"#).unwrap();
        assert_eq!(data.result(), None);
        assert_eq!(data.pdf_text(), Some("Jane Doe"));
        assert_eq!(data.extra.get("status"), Some(&Value::from("ok")));

        let back = serde_json::to_value(&data).unwrap();
        assert_eq!(back["status"], "ok");
        assert!(back.get("result").is_none());
    }

    #[test]
    fn empty_result_is_absent() {
        let data = with_result("");
        assert_eq!(data.result(), None);
        assert!(!data.requires_follow_up());
        assert_eq!(data.result.as_deref(), Some(""));
    }

    #[test]
    fn null_result_is_absent() {
        let data: ExtractedData = serde_json::from_str(r#"{"result":null}"#).unwrap();
        assert_eq!(data.result(), None);
    }
}
