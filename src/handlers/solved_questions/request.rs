//! Solved question request DTOs

use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create a record directly
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveSolvedQuestionRequest {
    pub student_id: Uuid,
    pub question_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub contest_question_id: Option<Uuid>,
    #[validate(range(min = 0, message = "Marks cannot be negative"))]
    pub obtained_marks: i32,
}

/// Raise the marks of a record
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMarksRequest {
    pub id: Uuid,
    #[validate(range(min = 0, message = "Marks cannot be negative"))]
    pub obtained_marks: i32,
}

/// Query parameters for listing records
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSolvedQuestionsQuery {
    pub contest_id: Option<Uuid>,
}
