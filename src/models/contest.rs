//! Contest model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Contest database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Contest {
    pub fn window(&self) -> ContestWindow {
        ContestWindow {
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Get status of the contest at `now`
    pub fn status_at(&self, now: DateTime<Utc>) -> ContestStatus {
        if now < self.start_time {
            ContestStatus::Upcoming
        } else if now <= self.end_time {
            ContestStatus::Ongoing
        } else {
            ContestStatus::Ended
        }
    }
}

/// Interval during which contest submissions are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ContestWindow {
    /// Both bounds are inclusive
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        now >= self.start_time && now <= self.end_time
    }
}

/// Contest status enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Upcoming,
    Ongoing,
    Ended,
}

impl std::fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Upcoming => write!(f, "upcoming"),
            Self::Ongoing => write!(f, "ongoing"),
            Self::Ended => write!(f, "ended"),
        }
    }
}

/// Contest question association; `marks` is what the question is worth in the contest
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestQuestion {
    pub id: Uuid,
    pub contest_id: Uuid,
    pub question_id: Uuid,
    pub marks: i32,
}
