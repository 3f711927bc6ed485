//! Solved question handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Solved question routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_solved_questions))
        .route("/save", post(handler::save_solved_question))
        .route("/update-marks", put(handler::update_marks))
}
