//! Postgres-backed score store

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    grading::{ReconcileOutcome, ScoreStore},
    models::{SolvedQuestion, SolvedQuestionKey},
};

use super::repositories::SolvedQuestionRepository;

/// Score store writing to the `solved_questions` table
#[derive(Debug, Clone)]
pub struct PgScoreStore {
    pool: PgPool,
}

impl PgScoreStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for PgScoreStore {
    async fn record_if_improved(
        &self,
        key: SolvedQuestionKey,
        contest_question_id: Option<Uuid>,
        obtained_marks: i32,
    ) -> AppResult<ReconcileOutcome> {
        let written = SolvedQuestionRepository::upsert_if_improved(
            &self.pool,
            &key,
            contest_question_id.as_ref(),
            obtained_marks,
        )
        .await?;

        let outcome = match written {
            Some(row) if row.inserted => ReconcileOutcome::Created { record: row.record },
            Some(row) => ReconcileOutcome::Improved {
                previous_marks: row.previous_marks.unwrap_or_default(),
                record: row.record,
            },
            // The conflict guard refused the write, so a row at least as good exists
            None => ReconcileOutcome::NoImprovement {
                existing_marks: self
                    .find(key)
                    .await?
                    .map(|r| r.obtained_marks)
                    .unwrap_or_default(),
                attempted_marks: obtained_marks,
            },
        };

        tracing::debug!(
            student_id = %key.student_id,
            question_id = %key.question_id,
            contest_id = ?key.contest_id,
            current_marks = outcome.current_marks(),
            "Score reconciled"
        );

        Ok(outcome)
    }

    async fn find(&self, key: SolvedQuestionKey) -> AppResult<Option<SolvedQuestion>> {
        SolvedQuestionRepository::find_by_key(&self.pool, &key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{containers, fixtures};

    #[tokio::test]
    #[ignore = "needs Docker"]
    async fn test_marks_only_go_up() {
        let pool = containers::pg_pool().await;
        let store = PgScoreStore::new(pool.clone());
        let key = SolvedQuestionKey {
            student_id: Uuid::new_v4(),
            question_id: fixtures::insert_question(&pool, 10).await,
            contest_id: None,
        };

        let first = store.record_if_improved(key, None, 6).await.unwrap();
        assert!(matches!(first, ReconcileOutcome::Created { .. }));

        let second = store.record_if_improved(key, None, 4).await.unwrap();
        assert_eq!(
            second,
            ReconcileOutcome::NoImprovement {
                existing_marks: 6,
                attempted_marks: 4
            }
        );

        let same = store.record_if_improved(key, None, 6).await.unwrap();
        assert!(matches!(same, ReconcileOutcome::NoImprovement { .. }));

        let third = store.record_if_improved(key, None, 9).await.unwrap();
        match third {
            ReconcileOutcome::Improved {
                previous_marks,
                record,
            } => {
                assert_eq!(previous_marks, 6);
                assert_eq!(record.obtained_marks, 9);
            }
            other => panic!("expected an improvement, got {:?}", other),
        }

        let stored = store.find(key).await.unwrap().unwrap();
        assert_eq!(stored.obtained_marks, 9);
    }

    #[tokio::test]
    #[ignore = "needs Docker"]
    async fn test_contest_record_is_separate_from_practice() {
        let pool = containers::pg_pool().await;
        let store = PgScoreStore::new(pool.clone());
        let practice = SolvedQuestionKey {
            student_id: Uuid::new_v4(),
            question_id: fixtures::insert_question(&pool, 10).await,
            contest_id: None,
        };
        let contest = SolvedQuestionKey {
            contest_id: Some(fixtures::insert_contest(&pool).await),
            ..practice
        };

        store.record_if_improved(practice, None, 8).await.unwrap();
        let outcome = store.record_if_improved(contest, None, 2).await.unwrap();

        assert!(matches!(outcome, ReconcileOutcome::Created { .. }));
        assert_eq!(store.find(practice).await.unwrap().unwrap().obtained_marks, 8);
        assert_eq!(store.find(contest).await.unwrap().unwrap().obtained_marks, 2);
    }

    #[tokio::test]
    #[ignore = "needs Docker"]
    async fn test_concurrent_practice_submits_keep_one_row() {
        let pool = containers::pg_pool().await;
        let store = PgScoreStore::new(pool.clone());
        let key = SolvedQuestionKey {
            student_id: Uuid::new_v4(),
            question_id: fixtures::insert_question(&pool, 10).await,
            contest_id: None,
        };

        let (a, b) = tokio::join!(
            store.record_if_improved(key, None, 5),
            store.record_if_improved(key, None, 7),
        );
        a.unwrap();
        b.unwrap();

        let rows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM solved_questions WHERE student_id = $1 AND contest_id IS NULL",
        )
        .bind(key.student_id)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(rows, 1);
        assert_eq!(store.find(key).await.unwrap().unwrap().obtained_marks, 7);
    }
}
