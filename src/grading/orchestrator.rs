//! Submission orchestrator
//!
//! Drives one submission through
//! `Idle -> Submitting -> AwaitingResult -> Scoring -> Done`, with any
//! non-terminal state able to fall into `Failed`. Precondition violations
//! never leave `Idle`; they only produce a warning. Every error is turned
//! into a [`Notification`] on the returned [`SubmissionReport`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    config::{ExecutionConfig, GradingConfig},
    error::AppError,
    execution::{ExecutionClient, ExecutionError},
    models::{
        ContestWindow, ExecutionResult, SolvedQuestionKey, SubmissionAction, SubmissionAttempt,
        TestVerdict,
    },
};

use super::{
    comparator::compare_outputs,
    scoring::{ReconcileOutcome, ScoreStore, ScoreSummary, ScoringTarget},
};

/// Orchestrator state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Submitting,
    AwaitingResult,
    Scoring,
    Done,
    Failed,
}

impl SubmissionState {
    /// A submission is running and a new one must not start
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitting | Self::AwaitingResult | Self::Scoring)
    }
}

/// Severity of the message shown to the student
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Contest a submission belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContestRef {
    pub contest_id: Uuid,
    pub window: ContestWindow,
}

/// What a submit is graded against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradingTarget {
    pub expected_output: String,
    pub scoring: ScoringTarget,
}

/// Everything the orchestrator needs to know besides the code itself.
///
/// Built explicitly by the caller from the authenticated session and the
/// question/contest data.
#[derive(Debug, Clone)]
pub struct SubmissionContext {
    pub student_id: Option<Uuid>,
    pub question_id: Option<Uuid>,
    pub contest: Option<ContestRef>,
    /// Required for [`SubmissionAction::Submit`]
    pub grading: Option<GradingTarget>,
    pub now: DateTime<Utc>,
}

/// Outcome of one orchestrated submission, sent back to the editor
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    pub action: SubmissionAction,
    pub state: SubmissionState,
    pub history: Vec<SubmissionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<ExecutionResult>,
    pub verdicts: Vec<TestVerdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<ReconcileOutcome>,
    pub notification: Notification,
}

/// Warning shown when a second submission is attempted while one runs
pub const SUBMISSION_IN_PROGRESS: &str = "A submission is already in progress";

impl SubmissionReport {
    /// Report for a submission that was never started
    pub fn rejected(action: SubmissionAction, message: impl Into<String>) -> Self {
        Self {
            action,
            state: SubmissionState::Idle,
            history: vec![SubmissionState::Idle],
            request_id: None,
            output: None,
            verdicts: Vec::new(),
            score: None,
            outcome: None,
            notification: Notification::new(NotificationLevel::Warning, message),
        }
    }
}

/// Deadlines and polling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub submit_timeout: Duration,
    pub fetch_timeout: Duration,
    pub poll_attempts: u32,
    pub poll_interval: Duration,
    pub reconcile_timeout: Duration,
}

impl OrchestratorSettings {
    pub fn from_config(execution: &ExecutionConfig, grading: &GradingConfig) -> Self {
        Self {
            submit_timeout: execution.submit_timeout,
            fetch_timeout: execution.fetch_timeout,
            poll_attempts: execution.poll_attempts.max(1),
            poll_interval: execution.poll_interval,
            reconcile_timeout: grading.reconcile_timeout,
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&ExecutionConfig::default(), &GradingConfig::default())
    }
}

/// Why a step did not complete
#[derive(Debug, thiserror::Error)]
enum StepError {
    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("{0}")]
    Store(#[from] AppError),

    #[error("{stage} timed out after {}ms", .limit.as_millis())]
    TimedOut { stage: &'static str, limit: Duration },

    #[error("Submission was cancelled")]
    Cancelled,
}

/// Validated shape of the work to do
enum Plan<'a> {
    Run,
    Submit {
        key: SolvedQuestionKey,
        grading: &'a GradingTarget,
    },
}

/// Runs a single submission at a time against an execution client and a score store.
///
/// Cross-request exclusion is not its job: the service builds one per
/// request and guards it with the per-student in-flight lock.
pub struct SubmissionOrchestrator {
    executor: Arc<dyn ExecutionClient>,
    store: Arc<dyn ScoreStore>,
    settings: OrchestratorSettings,
    state: SubmissionState,
    history: Vec<SubmissionState>,
}

impl SubmissionOrchestrator {
    pub fn new(
        executor: Arc<dyn ExecutionClient>,
        store: Arc<dyn ScoreStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            executor,
            store,
            settings,
            state: SubmissionState::Idle,
            history: vec![SubmissionState::Idle],
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Run or submit `attempt`.
    ///
    /// Never returns an error: failures end in [`SubmissionState::Failed`]
    /// and precondition violations leave the orchestrator `Idle`, both with a
    /// notification describing what happened.
    pub async fn execute(
        &mut self,
        action: SubmissionAction,
        attempt: SubmissionAttempt,
        ctx: &SubmissionContext,
        cancel: &CancellationToken,
    ) -> SubmissionReport {
        // `&mut self` rules out a concurrent call, so this is a previous
        // future that was dropped mid-flight
        if self.state.is_in_flight() {
            tracing::warn!(state = ?self.state, "Previous submission was abandoned, resetting");
        }

        self.state = SubmissionState::Idle;
        self.history = vec![SubmissionState::Idle];
        let mut report = self.blank_report(action);

        let plan = match check_preconditions(action, &attempt, ctx) {
            Ok(plan) => plan,
            Err(message) => {
                tracing::info!(action = %action, reason = %message, "Submission precondition failed");
                report.notification = Notification::new(NotificationLevel::Warning, message);
                return self.finish(report);
            }
        };

        tracing::info!(
            action = %action,
            language = %attempt.language,
            student_id = ?ctx.student_id,
            question_id = ?ctx.question_id,
            contest_id = ?ctx.contest.map(|c| c.contest_id),
            "Starting submission"
        );

        // Submitting
        self.transition(SubmissionState::Submitting);
        let submit = self
            .executor
            .submit(attempt.language, &attempt.source_code, &attempt.stdin);
        let request_id = match guarded("Code submission", self.settings.submit_timeout, cancel, submit).await {
            Ok(id) => id,
            Err(e) => return self.fail(report, e),
        };
        report.request_id = Some(request_id.clone());

        // AwaitingResult
        self.transition(SubmissionState::AwaitingResult);
        let output = match self.await_result(&request_id, cancel).await {
            Ok(output) => output,
            Err(e) => return self.fail(report, e),
        };

        let (key, grading) = match plan {
            Plan::Run => {
                report.notification = if output.has_stderr() {
                    Notification::new(NotificationLevel::Warning, "Program finished with errors")
                } else {
                    Notification::new(NotificationLevel::Info, "Program finished")
                };
                report.output = Some(output);
                self.transition(SubmissionState::Done);
                return self.finish(report);
            }
            Plan::Submit { key, grading } => (key, grading),
        };

        // Scoring
        self.transition(SubmissionState::Scoring);
        let verdicts = compare_outputs(&output.stdout, &grading.expected_output);
        let summary = ScoreSummary::from_verdicts(&verdicts, grading.scoring.total_marks);
        tracing::debug!(
            request_id = %request_id,
            passed = summary.passed_count,
            total = summary.total_count,
            obtained_marks = summary.obtained_marks,
            all_passed = summary.all_passed(),
            "Output compared"
        );

        report.output = Some(output);
        report.verdicts = verdicts;
        report.score = Some(summary);

        let record = self.store.record_if_improved(
            key,
            grading.scoring.contest_question_id,
            summary.obtained_marks,
        );
        let outcome = match guarded("Saving the score", self.settings.reconcile_timeout, cancel, record).await {
            Ok(outcome) => outcome,
            Err(e) => {
                // Verdicts stay on the report so the student still sees them
                tracing::error!(request_id = %request_id, error = %e, "Failed to reconcile score");
                self.transition(SubmissionState::Failed);
                report.notification = Notification::new(
                    NotificationLevel::Error,
                    format!("Your results are shown but the score could not be saved: {}", e),
                );
                return self.finish(report);
            }
        };

        report.notification = outcome_notification(&outcome, &summary);
        report.outcome = Some(outcome);
        self.transition(SubmissionState::Done);
        self.finish(report)
    }

    /// Fetch the result, polling while the service says it is not ready
    async fn await_result(
        &self,
        request_id: &str,
        cancel: &CancellationToken,
    ) -> Result<ExecutionResult, StepError> {
        let mut attempt = 1;
        loop {
            let fetch = self.executor.fetch_result(request_id);
            match guarded("Fetching the result", self.settings.fetch_timeout, cancel, fetch).await {
                Err(StepError::Execution(ExecutionError::NotReady))
                    if attempt < self.settings.poll_attempts =>
                {
                    tracing::debug!(request_id = %request_id, attempt, "Result not ready, polling again");
                    attempt += 1;
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => return Err(StepError::Cancelled),
                        _ = tokio::time::sleep(self.settings.poll_interval) => {}
                    }
                }
                other => return other,
            }
        }
    }

    fn transition(&mut self, next: SubmissionState) {
        tracing::debug!(from = ?self.state, to = ?next, "Submission state transition");
        self.state = next;
        self.history.push(next);
    }

    fn fail(&mut self, mut report: SubmissionReport, error: StepError) -> SubmissionReport {
        tracing::warn!(stage = ?self.state, error = %error, "Submission failed");
        self.transition(SubmissionState::Failed);
        report.notification = Notification::new(NotificationLevel::Error, error.to_string());
        self.finish(report)
    }

    fn finish(&self, mut report: SubmissionReport) -> SubmissionReport {
        report.state = self.state;
        report.history = self.history.clone();
        report
    }

    fn blank_report(&self, action: SubmissionAction) -> SubmissionReport {
        SubmissionReport {
            action,
            state: self.state,
            history: Vec::new(),
            request_id: None,
            output: None,
            verdicts: Vec::new(),
            score: None,
            outcome: None,
            notification: Notification::new(NotificationLevel::Info, ""),
        }
    }
}

/// Checks made before any network call
fn check_preconditions<'a>(
    action: SubmissionAction,
    attempt: &SubmissionAttempt,
    ctx: &'a SubmissionContext,
) -> Result<Plan<'a>, String> {
    if attempt.source_code.trim().is_empty() {
        return Err("Source code cannot be empty".to_string());
    }

    let (Some(student_id), Some(question_id)) = (ctx.student_id, ctx.question_id) else {
        return Err("Could not determine the student or question for this submission".to_string());
    };

    if let Some(contest) = &ctx.contest {
        if !contest.window.contains(ctx.now) {
            return Err("The contest is not active; submissions are closed".to_string());
        }
    }

    match action {
        SubmissionAction::Run => Ok(Plan::Run),
        SubmissionAction::Submit => {
            let grading = ctx
                .grading
                .as_ref()
                .ok_or_else(|| "This question cannot be graded".to_string())?;
            Ok(Plan::Submit {
                key: SolvedQuestionKey {
                    student_id,
                    question_id,
                    contest_id: ctx.contest.map(|c| c.contest_id),
                },
                grading,
            })
        }
    }
}

/// Apply a deadline and the cancellation token to one external call
async fn guarded<T, E, F>(
    stage: &'static str,
    limit: Duration,
    cancel: &CancellationToken,
    call: F,
) -> Result<T, StepError>
where
    F: Future<Output = Result<T, E>>,
    StepError: From<E>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StepError::Cancelled),
        res = tokio::time::timeout(limit, call) => match res {
            Ok(inner) => inner.map_err(StepError::from),
            Err(_) => Err(StepError::TimedOut { stage, limit }),
        },
    }
}

fn outcome_notification(outcome: &ReconcileOutcome, summary: &ScoreSummary) -> Notification {
    let total = summary.total_marks;
    match outcome {
        ReconcileOutcome::Created { record } => Notification::new(
            NotificationLevel::Success,
            format!("Score saved: {}/{}", record.obtained_marks, total),
        ),
        ReconcileOutcome::Improved {
            previous_marks,
            record,
        } => Notification::new(
            NotificationLevel::Success,
            format!(
                "New best score: {}/{} (previously {})",
                record.obtained_marks, total, previous_marks
            ),
        ),
        ReconcileOutcome::NoImprovement {
            existing_marks,
            attempted_marks,
        } => Notification::new(
            NotificationLevel::Info,
            format!(
                "Score {}/{} does not improve on your best of {}; nothing was saved",
                attempted_marks, total, existing_marks
            ),
        ),
    }
}
