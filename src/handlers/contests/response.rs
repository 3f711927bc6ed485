//! Contest response DTOs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::ContestStatus;

/// Contest response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: ContestStatus,
    pub contest_questions: Vec<ContestQuestionResponse>,
    pub created_at: DateTime<Utc>,
}

/// A question as it appears in a contest
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestQuestionResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub marks: i32,
}
