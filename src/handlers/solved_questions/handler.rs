//! Solved question handler implementations

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    middleware::auth::AuthenticatedUser,
    models::SolvedQuestion,
    services::SolvedQuestionService,
    state::AppState,
};

use super::{
    request::{ListSolvedQuestionsQuery, SaveSolvedQuestionRequest, UpdateMarksRequest},
    response::SolvedQuestionsListResponse,
};

/// List the caller's best-score records
pub async fn list_solved_questions(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Query(query): Query<ListSolvedQuestionsQuery>,
) -> AppResult<Json<SolvedQuestionsListResponse>> {
    let records =
        SolvedQuestionService::list_mine(state.db(), &auth_user, query.contest_id.as_ref()).await?;

    Ok(Json(records.into()))
}

/// Create a record
pub async fn save_solved_question(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<SaveSolvedQuestionRequest>,
) -> AppResult<(StatusCode, Json<SolvedQuestion>)> {
    payload.validate()?;

    let record = SolvedQuestionService::save(state.db(), &auth_user, payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Raise a record's marks
pub async fn update_marks(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(payload): Json<UpdateMarksRequest>,
) -> AppResult<Json<SolvedQuestion>> {
    payload.validate()?;

    let record = SolvedQuestionService::update_marks(state.db(), &auth_user, payload).await?;
    Ok(Json(record))
}
