//! Submission request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    constants::{MAX_SOURCE_CODE_SIZE, MAX_STDIN_SIZE},
    models::Language,
};

/// Run request: execute with custom stdin, nothing is scored
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub question_id: Uuid,

    /// Contest ID (optional - for contest questions)
    pub contest_id: Option<Uuid>,

    pub language: Language,

    /// Source code; emptiness is reported as a warning, not rejected here
    #[validate(length(max = MAX_SOURCE_CODE_SIZE))]
    pub source_code: String,

    /// Custom stdin, defaults to the question input
    #[validate(length(max = MAX_STDIN_SIZE))]
    pub stdin: Option<String>,
}

/// Submit request: execute against the question input and score
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub question_id: Uuid,

    /// Contest ID (optional - for contest submissions)
    pub contest_id: Option<Uuid>,

    pub language: Language,

    #[validate(length(max = MAX_SOURCE_CODE_SIZE))]
    pub source_code: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_deserializes() {
        let payload: SubmitRequest = serde_json::from_str(
            r#"{
                "questionId": "6f1c8f5e-2f55-4d8b-9d59-8e1e7c3b2a10",
                "contestId": null,
                "language": "cpp",
                "sourceCode": "int main() {}"
            }"#,
        )
        .unwrap();

        assert_eq!(payload.language, Language::Cpp);
        assert!(payload.contest_id.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_unknown_language_is_rejected() {
        let parsed = serde_json::from_str::<RunRequest>(
            r#"{
                "questionId": "6f1c8f5e-2f55-4d8b-9d59-8e1e7c3b2a10",
                "language": "brainfuck",
                "sourceCode": "+"
            }"#,
        );

        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_source_passes_validation() {
        let payload = SubmitRequest {
            question_id: Uuid::new_v4(),
            contest_id: None,
            language: Language::Python,
            source_code: String::new(),
        };

        assert!(payload.validate().is_ok());
    }

    #[test]
    fn test_oversized_source_and_stdin_are_rejected() {
        let too_long = "x".repeat(MAX_SOURCE_CODE_SIZE as usize + 1);

        let submit = SubmitRequest {
            question_id: Uuid::new_v4(),
            contest_id: None,
            language: Language::Python,
            source_code: too_long.clone(),
        };
        assert!(submit.validate().is_err());

        let run = RunRequest {
            question_id: Uuid::new_v4(),
            contest_id: None,
            language: Language::Python,
            source_code: "print(1)".to_string(),
            stdin: Some("y".repeat(MAX_STDIN_SIZE as usize + 1)),
        };
        assert!(run.validate().is_err());
    }
}
