//! Contest service

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::repositories::ContestRepository,
    error::{AppError, AppResult},
    handlers::contests::response::{ContestQuestionResponse, ContestResponse},
    models::{Contest, ContestQuestion},
};

/// Contest service for business logic
pub struct ContestService;

impl ContestService {
    /// Get contest by ID together with the marks of its questions
    pub async fn get_contest(pool: &PgPool, id: &Uuid) -> AppResult<ContestResponse> {
        let contest = ContestRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        let questions = ContestRepository::list_questions(pool, id).await?;

        Ok(Self::to_contest_response(contest, questions))
    }

    fn to_contest_response(contest: Contest, questions: Vec<ContestQuestion>) -> ContestResponse {
        let status = contest.status_at(Utc::now());

        ContestResponse {
            id: contest.id,
            title: contest.title,
            description: contest.description,
            start_time: contest.start_time,
            end_time: contest.end_time,
            status,
            contest_questions: questions
                .into_iter()
                .map(|q| ContestQuestionResponse {
                    id: q.id,
                    question_id: q.question_id,
                    marks: q.marks,
                })
                .collect(),
            created_at: contest.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContestStatus;
    use chrono::Duration;

    #[test]
    fn test_contest_response_carries_question_marks() {
        let now = Utc::now();
        let contest = Contest {
            id: Uuid::new_v4(),
            title: "Finals".to_string(),
            description: Some("Last round".to_string()),
            start_time: now - Duration::hours(1),
            end_time: now + Duration::hours(1),
            created_at: now - Duration::days(1),
        };
        let question = ContestQuestion {
            id: Uuid::new_v4(),
            contest_id: contest.id,
            question_id: Uuid::new_v4(),
            marks: 40,
        };

        let response = ContestService::to_contest_response(contest.clone(), vec![question.clone()]);

        assert_eq!(response.id, contest.id);
        assert_eq!(response.status, ContestStatus::Ongoing);
        assert_eq!(response.contest_questions.len(), 1);
        assert_eq!(response.contest_questions[0].question_id, question.question_id);
        assert_eq!(response.contest_questions[0].marks, 40);
    }
}
