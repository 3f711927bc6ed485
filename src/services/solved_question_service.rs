//! Solved question service

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::SolvedQuestionRepository,
    error::{AppError, AppResult},
    grading::{decide, ReconcileDecision},
    handlers::solved_questions::request::{SaveSolvedQuestionRequest, UpdateMarksRequest},
    middleware::auth::AuthenticatedUser,
    models::{SolvedQuestion, SolvedQuestionKey},
};

/// Solved question service for business logic
pub struct SolvedQuestionService;

impl SolvedQuestionService {
    /// List the caller's best-score records
    pub async fn list_mine(
        pool: &PgPool,
        user: &AuthenticatedUser,
        contest_id: Option<&Uuid>,
    ) -> AppResult<Vec<SolvedQuestion>> {
        SolvedQuestionRepository::list_for_student(pool, &user.id, contest_id).await
    }

    /// Create a record directly (admin only)
    pub async fn save(
        pool: &PgPool,
        user: &AuthenticatedUser,
        payload: SaveSolvedQuestionRequest,
    ) -> AppResult<SolvedQuestion> {
        user.require_admin()?;

        let key = SolvedQuestionKey {
            student_id: payload.student_id,
            question_id: payload.question_id,
            contest_id: payload.contest_id,
        };

        let record = SolvedQuestionRepository::create(
            pool,
            &key,
            payload.contest_question_id.as_ref(),
            payload.obtained_marks,
        )
        .await
        .map_err(|e| match e {
            AppError::AlreadyExists(_) => AppError::AlreadyExists(
                "A solved question record already exists for this student and question"
                    .to_string(),
            ),
            other => other,
        })?;

        tracing::info!(
            record_id = %record.id,
            admin_id = %user.id,
            obtained_marks = record.obtained_marks,
            "Solved question record saved"
        );

        Ok(record)
    }

    /// Raise the marks of an existing record (admin only); never lowers them
    pub async fn update_marks(
        pool: &PgPool,
        user: &AuthenticatedUser,
        payload: UpdateMarksRequest,
    ) -> AppResult<SolvedQuestion> {
        user.require_admin()?;

        let existing = SolvedQuestionRepository::find_by_id(pool, &payload.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Solved question not found".to_string()))?;

        let not_lower = |stored: i32| {
            AppError::Conflict(format!(
                "Stored marks {} are not lower than {}",
                stored, payload.obtained_marks
            ))
        };

        if decide(Some(existing.obtained_marks), payload.obtained_marks)
            != ReconcileDecision::Update
        {
            return Err(not_lower(existing.obtained_marks));
        }

        // A concurrent write may have raised the record since it was read
        let record =
            SolvedQuestionRepository::raise_marks(pool, &payload.id, payload.obtained_marks)
                .await?
                .ok_or_else(|| not_lower(existing.obtained_marks))?;

        tracing::info!(
            record_id = %record.id,
            admin_id = %user.id,
            previous_marks = existing.obtained_marks,
            obtained_marks = record.obtained_marks,
            "Solved question marks raised"
        );

        Ok(record)
    }
}
