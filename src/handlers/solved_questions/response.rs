//! Solved question response DTOs

use serde::Serialize;

use crate::models::SolvedQuestion;

/// List of the caller's records
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedQuestionsListResponse {
    pub solved_questions: Vec<SolvedQuestion>,
    pub total_marks: i64,
}

impl From<Vec<SolvedQuestion>> for SolvedQuestionsListResponse {
    fn from(solved_questions: Vec<SolvedQuestion>) -> Self {
        let total_marks = solved_questions
            .iter()
            .map(|r| i64::from(r.obtained_marks))
            .sum();

        Self {
            solved_questions,
            total_marks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_list_serializes_camel_case() {
        let now = Utc::now();
        let record = SolvedQuestion {
            id: Uuid::new_v4(),
            question_id: Uuid::new_v4(),
            contest_id: None,
            student_id: Uuid::new_v4(),
            obtained_marks: 7,
            contest_question_id: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(SolvedQuestionsListResponse::from(vec![record])).unwrap();

        assert_eq!(json["totalMarks"], 7);
        assert_eq!(json["solvedQuestions"][0]["obtainedMarks"], 7);
        assert!(json["solvedQuestions"][0].get("questionId").is_some());
        assert!(json["solvedQuestions"][0].get("obtained_marks").is_none());
    }
}
