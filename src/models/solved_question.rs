//! Solved question model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Best-score record for a student/question/contest combination
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedQuestion {
    pub id: Uuid,
    pub question_id: Uuid,
    pub contest_id: Option<Uuid>,
    pub student_id: Uuid,
    pub obtained_marks: i32,
    pub contest_question_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// At most one record per key is current
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolvedQuestionKey {
    pub student_id: Uuid,
    pub question_id: Uuid,
    /// `None` for practice submissions outside any contest
    pub contest_id: Option<Uuid>,
}
