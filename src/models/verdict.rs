//! Test verdict model

use serde::{Deserialize, Serialize};

/// Pass/fail outcome for one line of output; recomputed on every submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestVerdict {
    /// Position among the non-blank lines (0-indexed)
    pub index: usize,
    pub expected_line: String,
    pub actual_line: String,
    pub passed: bool,
}
