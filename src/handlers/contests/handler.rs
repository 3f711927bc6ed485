//! Contest handler implementations

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{error::AppResult, services::ContestService, state::AppState};

use super::response::ContestResponse;

/// Get contest metadata: window, status and per-question marks
pub async fn get_contest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ContestResponse>> {
    let contest = ContestService::get_contest(state.db(), &id).await?;
    Ok(Json(contest))
}
