//! Solved question repository

use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{SolvedQuestion, SolvedQuestionKey},
};

/// Row written by the conditional upsert
#[derive(Debug, FromRow)]
pub struct UpsertedRecord {
    #[sqlx(flatten)]
    pub record: SolvedQuestion,
    /// `false` when an existing row was raised
    pub inserted: bool,
    /// Stored mark before the statement ran, if there was a row
    pub previous_marks: Option<i32>,
}

/// Repository for solved question database operations
pub struct SolvedQuestionRepository;

impl SolvedQuestionRepository {
    /// Store `obtained_marks` for the key unless the stored mark is at least as high.
    ///
    /// Runs as a single statement so concurrent submissions for the same key
    /// cannot lower the mark. Returns `None` when nothing was written.
    pub async fn upsert_if_improved(
        pool: &PgPool,
        key: &SolvedQuestionKey,
        contest_question_id: Option<&Uuid>,
        obtained_marks: i32,
    ) -> AppResult<Option<UpsertedRecord>> {
        let row = sqlx::query_as::<_, UpsertedRecord>(
            r#"
            WITH prior AS (
                SELECT obtained_marks FROM solved_questions
                WHERE student_id = $1
                    AND question_id = $2
                    AND contest_id IS NOT DISTINCT FROM $3
            )
            INSERT INTO solved_questions (student_id, question_id, contest_id, contest_question_id, obtained_marks)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (student_id, question_id, contest_id) DO UPDATE SET
                obtained_marks = EXCLUDED.obtained_marks,
                contest_question_id = COALESCE(EXCLUDED.contest_question_id, solved_questions.contest_question_id),
                updated_at = NOW()
            WHERE solved_questions.obtained_marks < EXCLUDED.obtained_marks
            RETURNING
                solved_questions.*,
                (xmax = 0) AS inserted,
                (SELECT obtained_marks FROM prior) AS previous_marks
            "#,
        )
        .bind(key.student_id)
        .bind(key.question_id)
        .bind(key.contest_id)
        .bind(contest_question_id)
        .bind(obtained_marks)
        .fetch_optional(pool)
        .await?;

        Ok(row)
    }

    /// Create a record; fails if one already exists for the key
    pub async fn create(
        pool: &PgPool,
        key: &SolvedQuestionKey,
        contest_question_id: Option<&Uuid>,
        obtained_marks: i32,
    ) -> AppResult<SolvedQuestion> {
        let record = sqlx::query_as::<_, SolvedQuestion>(
            r#"
            INSERT INTO solved_questions (student_id, question_id, contest_id, contest_question_id, obtained_marks)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(key.student_id)
        .bind(key.question_id)
        .bind(key.contest_id)
        .bind(contest_question_id)
        .bind(obtained_marks)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Raise the marks of a record; returns `None` when the stored mark is not lower
    pub async fn raise_marks(
        pool: &PgPool,
        id: &Uuid,
        obtained_marks: i32,
    ) -> AppResult<Option<SolvedQuestion>> {
        let record = sqlx::query_as::<_, SolvedQuestion>(
            r#"
            UPDATE solved_questions
            SET obtained_marks = $2, updated_at = NOW()
            WHERE id = $1 AND obtained_marks < $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(obtained_marks)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Find record by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<SolvedQuestion>> {
        let record = sqlx::query_as::<_, SolvedQuestion>(
            r#"SELECT * FROM solved_questions WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Find the current record for a key
    pub async fn find_by_key(
        pool: &PgPool,
        key: &SolvedQuestionKey,
    ) -> AppResult<Option<SolvedQuestion>> {
        let record = sqlx::query_as::<_, SolvedQuestion>(
            r#"
            SELECT * FROM solved_questions
            WHERE student_id = $1
                AND question_id = $2
                AND contest_id IS NOT DISTINCT FROM $3
            "#,
        )
        .bind(key.student_id)
        .bind(key.question_id)
        .bind(key.contest_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// List a student's records, optionally limited to one contest
    pub async fn list_for_student(
        pool: &PgPool,
        student_id: &Uuid,
        contest_id: Option<&Uuid>,
    ) -> AppResult<Vec<SolvedQuestion>> {
        let records = sqlx::query_as::<_, SolvedQuestion>(
            r#"
            SELECT * FROM solved_questions
            WHERE student_id = $1
                AND ($2::uuid IS NULL OR contest_id = $2)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(student_id)
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
