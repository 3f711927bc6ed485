//! Submission service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    db::{
        repositories::{ContestRepository, QuestionRepository},
        PgScoreStore,
    },
    error::{AppError, AppResult},
    grading::{
        ContestRef, GradingTarget, OrchestratorSettings, ScoringTarget, SubmissionContext,
        SubmissionOrchestrator, SubmissionReport, SUBMISSION_IN_PROGRESS,
    },
    handlers::submissions::request::{RunRequest, SubmitRequest},
    middleware::auth::AuthenticatedUser,
    models::{Contest, ContestQuestion, Question, SubmissionAction, SubmissionAttempt},
    state::AppState,
};

use super::in_flight::InFlightLock;

/// Submission service for business logic
pub struct SubmissionService;

impl SubmissionService {
    /// Execute code with custom input; nothing is scored or stored
    pub async fn run(
        state: &AppState,
        user: &AuthenticatedUser,
        payload: RunRequest,
    ) -> AppResult<SubmissionReport> {
        let attempt = SubmissionAttempt {
            source_code: payload.source_code,
            language: payload.language,
            stdin: payload.stdin.unwrap_or_default(),
        };

        Self::process(
            state,
            user,
            SubmissionAction::Run,
            payload.question_id,
            payload.contest_id,
            attempt,
        )
        .await
    }

    /// Execute code against the question input, score it and keep the best mark
    pub async fn submit(
        state: &AppState,
        user: &AuthenticatedUser,
        payload: SubmitRequest,
    ) -> AppResult<SubmissionReport> {
        let attempt = SubmissionAttempt {
            source_code: payload.source_code,
            language: payload.language,
            stdin: String::new(),
        };

        Self::process(
            state,
            user,
            SubmissionAction::Submit,
            payload.question_id,
            payload.contest_id,
            attempt,
        )
        .await
    }

    async fn process(
        state: &AppState,
        user: &AuthenticatedUser,
        action: SubmissionAction,
        question_id: Uuid,
        contest_id: Option<Uuid>,
        mut attempt: SubmissionAttempt,
    ) -> AppResult<SubmissionReport> {
        let pool = state.db();

        let question = QuestionRepository::find_by_id(pool, &question_id).await?;

        let (contest, contest_question) = match contest_id {
            Some(id) => {
                let contest = ContestRepository::find_by_id(pool, &id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;
                let contest_question =
                    ContestRepository::find_contest_question(pool, &id, &question_id).await?;
                (Some(contest), contest_question)
            }
            None => (None, None),
        };

        let ctx = build_context(
            action,
            &user.id,
            question.as_ref(),
            contest.as_ref(),
            contest_question.as_ref(),
            Utc::now(),
        );
        attempt.stdin = choose_stdin(action, attempt.stdin, question.as_ref());

        let Some(lock) = InFlightLock::acquire(
            state.redis(),
            &user.id,
            &question_id,
            state.config().grading.in_flight_lock_ttl,
        )
        .await?
        else {
            tracing::info!(
                student_id = %user.id,
                question_id = %question_id,
                "Submission rejected: another one is in flight"
            );
            return Ok(SubmissionReport::rejected(action, SUBMISSION_IN_PROGRESS));
        };

        let settings = OrchestratorSettings::from_config(
            &state.config().execution,
            &state.config().grading,
        );
        let mut orchestrator = SubmissionOrchestrator::new(
            state.executor(),
            Arc::new(PgScoreStore::new(pool.clone())),
            settings,
        );

        let cancel = state.shutdown().child_token();
        let report = orchestrator.execute(action, attempt, &ctx, &cancel).await;
        lock.release().await;

        tracing::info!(
            student_id = %user.id,
            question_id = %question_id,
            action = %action,
            state = ?report.state,
            "Submission finished"
        );

        Ok(report)
    }
}

/// Assemble the explicit context the orchestrator checks and grades against.
///
/// A question that does not belong to the requested contest is treated as
/// unresolved, so the orchestrator refuses it.
fn build_context(
    action: SubmissionAction,
    student_id: &Uuid,
    question: Option<&Question>,
    contest: Option<&Contest>,
    contest_question: Option<&ContestQuestion>,
    now: DateTime<Utc>,
) -> SubmissionContext {
    let question = question.filter(|_| contest.is_none() || contest_question.is_some());

    let grading = match (action, question) {
        (SubmissionAction::Submit, Some(q)) => Some(GradingTarget {
            expected_output: q.expected_output.clone(),
            scoring: ScoringTarget {
                total_marks: contest_question.map_or(q.marks, |cq| cq.marks),
                contest_question_id: contest_question.map(|cq| cq.id),
            },
        }),
        _ => None,
    };

    SubmissionContext {
        student_id: Some(*student_id),
        question_id: question.map(|q| q.id),
        contest: contest.map(|c| ContestRef {
            contest_id: c.id,
            window: c.window(),
        }),
        grading,
        now,
    }
}

/// Submit always uses the question input; Run falls back to it when no custom stdin is given
fn choose_stdin(action: SubmissionAction, custom: String, question: Option<&Question>) -> String {
    let question_input = || question.map(|q| q.input.clone()).unwrap_or_default();
    match action {
        SubmissionAction::Submit => question_input(),
        SubmissionAction::Run if custom.is_empty() => question_input(),
        SubmissionAction::Run => custom,
    }
}
