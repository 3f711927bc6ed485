//! Score computation and best-score reconciliation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{SolvedQuestion, SolvedQuestionKey, TestVerdict},
};

/// What a question is worth and which contest entry it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringTarget {
    pub total_marks: i32,
    pub contest_question_id: Option<Uuid>,
}

/// Marks earned by one submission
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub passed_count: usize,
    pub total_count: usize,
    /// 0 when there was nothing to compare
    pub percentage_passed: f64,
    pub total_marks: i32,
    pub obtained_marks: i32,
}

impl ScoreSummary {
    /// Award marks in proportion to the passed verdicts
    pub fn from_verdicts(verdicts: &[TestVerdict], total_marks: i32) -> Self {
        let total_count = verdicts.len();
        let passed_count = verdicts.iter().filter(|v| v.passed).count();

        let percentage_passed = if total_count == 0 {
            0.0
        } else {
            passed_count as f64 / total_count as f64 * 100.0
        };

        Self {
            passed_count,
            total_count,
            percentage_passed,
            total_marks,
            obtained_marks: proportional_marks(passed_count, total_count, total_marks),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.total_count > 0 && self.passed_count == self.total_count
    }
}

/// `round(passed / total * marks)` with halves rounded up, in exact integer arithmetic
pub fn proportional_marks(passed: usize, total: usize, marks: i32) -> i32 {
    if total == 0 || marks <= 0 {
        return 0;
    }

    let passed = passed as i64;
    let total = total as i64;
    let marks = marks as i64;

    ((2 * passed * marks + total) / (2 * total)) as i32
}

/// Keep-the-best rule for a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileDecision {
    Create,
    Update,
    NoImprovement,
}

/// Decide what to do with a new mark given the stored one, if any
pub fn decide(existing_marks: Option<i32>, obtained_marks: i32) -> ReconcileDecision {
    match existing_marks {
        None => ReconcileDecision::Create,
        Some(existing) if existing >= obtained_marks => ReconcileDecision::NoImprovement,
        Some(_) => ReconcileDecision::Update,
    }
}

/// Result of offering a new mark to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ReconcileOutcome {
    Created {
        record: SolvedQuestion,
    },
    Improved {
        previous_marks: i32,
        record: SolvedQuestion,
    },
    /// Not an error: the stored mark is already at least as good
    NoImprovement {
        existing_marks: i32,
        attempted_marks: i32,
    },
}

impl ReconcileOutcome {
    /// Marks stored for the key after reconciliation
    pub fn current_marks(&self) -> i32 {
        match self {
            Self::Created { record } | Self::Improved { record, .. } => record.obtained_marks,
            Self::NoImprovement { existing_marks, .. } => *existing_marks,
        }
    }
}

/// Persistence of best-score records.
///
/// Implementations must apply `record_if_improved` atomically: concurrent
/// calls for the same key may never lower the stored mark.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn record_if_improved(
        &self,
        key: SolvedQuestionKey,
        contest_question_id: Option<Uuid>,
        obtained_marks: i32,
    ) -> AppResult<ReconcileOutcome>;

    /// Current record for a key, if any
    async fn find(&self, key: SolvedQuestionKey) -> AppResult<Option<SolvedQuestion>>;
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    /// In-memory store applying the same rule under a lock
    #[derive(Default)]
    pub struct MemoryScoreStore {
        records: Mutex<HashMap<SolvedQuestionKey, SolvedQuestion>>,
    }

    impl MemoryScoreStore {
        pub fn marks(&self, key: &SolvedQuestionKey) -> Option<i32> {
            self.records
                .lock()
                .unwrap()
                .get(key)
                .map(|r| r.obtained_marks)
        }

        pub fn len(&self) -> usize {
            self.records.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ScoreStore for MemoryScoreStore {
        async fn record_if_improved(
            &self,
            key: SolvedQuestionKey,
            contest_question_id: Option<Uuid>,
            obtained_marks: i32,
        ) -> AppResult<ReconcileOutcome> {
            let mut records = self.records.lock().unwrap();
            let existing = records.get(&key).map(|r| r.obtained_marks);

            Ok(match decide(existing, obtained_marks) {
                ReconcileDecision::Create => {
                    let now = Utc::now();
                    let record = SolvedQuestion {
                        id: Uuid::new_v4(),
                        question_id: key.question_id,
                        contest_id: key.contest_id,
                        student_id: key.student_id,
                        obtained_marks,
                        contest_question_id,
                        created_at: now,
                        updated_at: now,
                    };
                    records.insert(key, record.clone());
                    ReconcileOutcome::Created { record }
                }
                ReconcileDecision::Update => {
                    let record = records.get_mut(&key).unwrap();
                    let previous_marks = record.obtained_marks;
                    record.obtained_marks = obtained_marks;
                    record.updated_at = Utc::now();
                    ReconcileOutcome::Improved {
                        previous_marks,
                        record: record.clone(),
                    }
                }
                ReconcileDecision::NoImprovement => ReconcileOutcome::NoImprovement {
                    existing_marks: existing.unwrap_or_default(),
                    attempted_marks: obtained_marks,
                },
            })
        }

        async fn find(&self, key: SolvedQuestionKey) -> AppResult<Option<SolvedQuestion>> {
            Ok(self.records.lock().unwrap().get(&key).cloned())
        }
    }
}
