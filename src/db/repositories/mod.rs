//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod contest_repo;
pub mod question_repo;
pub mod solved_question_repo;

pub use contest_repo::ContestRepository;
pub use question_repo::QuestionRepository;
pub use solved_question_repo::SolvedQuestionRepository;
