//! Contest repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Contest, ContestQuestion},
};

/// Repository for contest database operations
pub struct ContestRepository;

impl ContestRepository {
    /// Find contest by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contests WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(contest)
    }

    /// List the questions of a contest with their marks
    pub async fn list_questions(
        pool: &PgPool,
        contest_id: &Uuid,
    ) -> AppResult<Vec<ContestQuestion>> {
        let questions = sqlx::query_as::<_, ContestQuestion>(
            r#"
            SELECT id, contest_id, question_id, marks
            FROM contest_questions
            WHERE contest_id = $1
            ORDER BY question_id
            "#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(questions)
    }

    /// Find the entry of a question inside a contest
    pub async fn find_contest_question(
        pool: &PgPool,
        contest_id: &Uuid,
        question_id: &Uuid,
    ) -> AppResult<Option<ContestQuestion>> {
        let question = sqlx::query_as::<_, ContestQuestion>(
            r#"
            SELECT id, contest_id, question_id, marks
            FROM contest_questions
            WHERE contest_id = $1 AND question_id = $2
            "#,
        )
        .bind(contest_id)
        .bind(question_id)
        .fetch_optional(pool)
        .await?;

        Ok(question)
    }
}
