//! Question repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::{error::AppResult, models::Question};

/// Repository for question database operations
pub struct QuestionRepository;

impl QuestionRepository {
    /// Find question by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Question>> {
        let question = sqlx::query_as::<_, Question>(r#"SELECT * FROM questions WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(question)
    }
}
