//! Submission grader
//!
//! Backend for the code editor of a programming-education platform. It runs
//! student code on a remote execution service, compares the output with the
//! expected output line by line, converts the pass rate into marks and keeps
//! each student's best mark per question.
//!
//! # Architecture
//!
//! The application follows a layered architecture:
//! - **Handlers**: HTTP request handlers (thin layer)
//! - **Services**: Business logic, session and lock handling
//! - **Grading**: Comparator, scoring and the submission orchestrator
//! - **Execution**: Client for the remote execution service
//! - **Repositories**: Database access
//! - **Models**: Domain models

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod execution;
pub mod grading;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
