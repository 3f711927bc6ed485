//! Submission model

use serde::{Deserialize, Serialize};

/// Programming language accepted by the execution service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Java,
    Python,
    Javascript,
}

impl Language {
    /// Get language as the identifier sent to the execution service
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C => "c",
            Self::Cpp => "cpp",
            Self::Java => "java",
            Self::Python => "python",
            Self::Javascript => "javascript",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What the student asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionAction {
    /// Execute and show raw output, never scored
    Run,
    /// Execute against the question input, score and keep the best mark
    Submit,
}

impl SubmissionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Submit => "submit",
        }
    }
}

impl std::fmt::Display for SubmissionAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One attempt from the editor; discarded once the report is returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAttempt {
    pub source_code: String,
    pub language: Language,
    pub stdin: String,
}
