//! Execution service result model

use serde::{Deserialize, Serialize};

/// Transient copy of what the execution service produced for a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub request_id: String,
    /// Newline-delimited program output
    pub stdout: String,
    pub stderr: Option<String>,
}

impl ExecutionResult {
    /// Whether the program wrote anything to stderr
    pub fn has_stderr(&self) -> bool {
        self.stderr.as_deref().is_some_and(|s| !s.trim().is_empty())
    }
}
