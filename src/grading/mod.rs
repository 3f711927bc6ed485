//! Submission grading
//!
//! The grading core is split into three parts:
//!
//! 1. **Comparator** (`comparator.rs`): per-line verdicts of actual against
//!    expected output.
//! 2. **Scoring** (`scoring.rs`): proportional marks and the keep-the-best
//!    reconciliation against stored records.
//! 3. **Orchestrator** (`orchestrator.rs`): sequences execution, comparison
//!    and reconciliation as a small state machine.

pub mod comparator;
pub mod orchestrator;
pub mod scoring;

pub use comparator::compare_outputs;
pub use orchestrator::{
    ContestRef, GradingTarget, Notification, NotificationLevel, OrchestratorSettings,
    SubmissionContext, SubmissionOrchestrator, SubmissionReport, SubmissionState,
    SUBMISSION_IN_PROGRESS,
};
pub use scoring::{
    decide, ReconcileDecision, ReconcileOutcome, ScoreStore, ScoreSummary, ScoringTarget,
};
