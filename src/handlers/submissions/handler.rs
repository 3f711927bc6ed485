//! Submission handler implementations

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    error::AppResult,
    grading::SubmissionReport,
    middleware::auth::AuthenticatedUser,
    services::SubmissionService,
    state::AppState,
};

use super::request::{RunRequest, SubmitRequest};

/// Execute code with custom input and return the raw output
pub async fn run_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<RunRequest>,
) -> AppResult<Json<SubmissionReport>> {
    payload.validate()?;

    let report = SubmissionService::run(&state, &auth_user, payload).await?;
    Ok(Json(report))
}

/// Execute code against the question input and grade it
pub async fn submit_submission(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<SubmitRequest>,
) -> AppResult<Json<SubmissionReport>> {
    payload.validate()?;

    let report = SubmissionService::submit(&state, &auth_user, payload).await?;
    Ok(Json(report))
}
