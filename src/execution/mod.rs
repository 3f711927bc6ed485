//! Code execution service client
//!
//! The execution service compiles and runs submitted source code. It is used
//! in two steps: `submit` hands over the code and returns a request id, then
//! `fetch_result` collects stdout/stderr for that id.

pub mod http;

use async_trait::async_trait;

use crate::models::{ExecutionResult, Language};

pub use http::HttpExecutionClient;

/// Errors reported by an execution client
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("Failed to submit code for execution: {0}")]
    Submit(String),

    #[error("Failed to fetch execution result: {0}")]
    Result(String),

    /// The request is known but the service has not finished it yet
    #[error("Execution result is not ready yet")]
    NotReady,
}

/// Contract consumed by the submission orchestrator
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionClient: Send + Sync {
    /// Hand source code to the service, returning its request id
    async fn submit(
        &self,
        language: Language,
        source_code: &str,
        stdin: &str,
    ) -> Result<String, ExecutionError>;

    /// Fetch the output of a previously submitted request
    async fn fetch_result(&self, request_id: &str) -> Result<ExecutionResult, ExecutionError>;
}
