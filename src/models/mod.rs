//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod contest;
pub mod execution;
pub mod question;
pub mod solved_question;
pub mod submission;
pub mod verdict;

pub use contest::*;
pub use execution::*;
pub use question::*;
pub use solved_question::*;
pub use submission::*;
pub use verdict::*;
