//! Question model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Question database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Stdin fed to the program on submit
    #[serde(skip_serializing)]
    pub input: String,
    #[serde(skip_serializing)]
    pub expected_output: String,
    /// Marks for practice submissions; contests override this per question
    pub marks: i32,
    pub created_at: DateTime<Utc>,
}
