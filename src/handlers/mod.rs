//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod contests;
pub mod health;
pub mod solved_questions;
pub mod submissions;

use axum::{middleware, Router};

use crate::{middleware::auth::auth_middleware, state::AppState};

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, auth_middleware);

    Router::new()
        .merge(health::routes())
        .nest("/contests", contests::routes())
        .nest(
            "/submissions",
            submissions::routes().route_layer(auth.clone()),
        )
        .nest(
            "/solved-questions",
            solved_questions::routes().route_layer(auth),
        )
}
