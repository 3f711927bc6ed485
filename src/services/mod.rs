//! Business logic services

pub mod auth_service;
pub mod contest_service;
pub mod in_flight;
pub mod solved_question_service;
pub mod submission_service;

pub use auth_service::AuthService;
pub use contest_service::ContestService;
pub use in_flight::InFlightLock;
pub use solved_question_service::SolvedQuestionService;
pub use submission_service::SubmissionService;
