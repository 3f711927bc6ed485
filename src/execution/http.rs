//! HTTP implementation of the execution client

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};

use crate::{
    config::ExecutionConfig,
    error::{AppError, AppResult},
    models::{ExecutionResult, Language},
};

use super::{ExecutionClient, ExecutionError};

/// Body of `POST /submit`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitBody<'a> {
    language: &'a str,
    code: &'a str,
    input_data: &'a str,
}

/// Response of `POST /submit`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    request_id: String,
}

/// Response of `GET /result/{request_id}`
#[derive(Debug, Deserialize)]
struct ResultResponse {
    output: Option<String>,
    stderr: Option<String>,
}

/// Execution client talking to the service over HTTP
#[derive(Debug, Clone)]
pub struct HttpExecutionClient {
    client: Client,
    base_url: Url,
}

impl HttpExecutionClient {
    /// Create a client from configuration
    ///
    /// The reqwest timeout is only a backstop; the orchestrator enforces its
    /// own per-call deadlines.
    pub fn new(config: &ExecutionConfig) -> AppResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::Configuration(format!(
                "invalid EXECUTION_BASE_URL {:?}: {}",
                config.base_url, e
            ))
        })?;

        if base_url.cannot_be_a_base() || !matches!(base_url.scheme(), "http" | "https") {
            return Err(AppError::Configuration(format!(
                "EXECUTION_BASE_URL must be an http(s) URL, got {:?}",
                config.base_url
            )));
        }

        let backstop = config.submit_timeout.max(config.fetch_timeout) * 2;
        let client = Client::builder().timeout(backstop).build().map_err(|e| {
            AppError::Configuration(format!("failed to build HTTP client: {}", e))
        })?;

        Ok(Self { client, base_url })
    }

    /// Base URL with `segments` appended, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL can hold path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn submit_url(&self) -> Url {
        self.endpoint(&["submit"])
    }

    fn result_url(&self, request_id: &str) -> Url {
        self.endpoint(&["result", request_id])
    }
}

#[async_trait]
impl ExecutionClient for HttpExecutionClient {
    async fn submit(
        &self,
        language: Language,
        source_code: &str,
        stdin: &str,
    ) -> Result<String, ExecutionError> {
        let body = SubmitBody {
            language: language.as_str(),
            code: source_code,
            input_data: stdin,
        };

        let res = self
            .client
            .post(self.submit_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ExecutionError::Submit(e.to_string()))?;

        if let Err(e) = res.error_for_status_ref() {
            tracing::warn!(status = %res.status(), "Execution service rejected submission");
            return Err(ExecutionError::Submit(e.to_string()));
        }

        let payload: SubmitResponse = res
            .json()
            .await
            .map_err(|e| ExecutionError::Submit(format!("malformed response: {}", e)))?;

        if payload.request_id.is_empty() {
            return Err(ExecutionError::Submit("empty request id".to_string()));
        }

        tracing::debug!(request_id = %payload.request_id, language = %language, "Code submitted");
        Ok(payload.request_id)
    }

    async fn fetch_result(&self, request_id: &str) -> Result<ExecutionResult, ExecutionError> {
        let res = self
            .client
            .get(self.result_url(request_id))
            .send()
            .await
            .map_err(|e| ExecutionError::Result(e.to_string()))?;

        if res.status() == StatusCode::ACCEPTED {
            return Err(ExecutionError::NotReady);
        }

        if let Err(e) = res.error_for_status_ref() {
            tracing::warn!(
                request_id = %request_id,
                status = %res.status(),
                "Execution service could not produce a result"
            );
            return Err(ExecutionError::Result(e.to_string()));
        }

        let payload: ResultResponse = res
            .json()
            .await
            .map_err(|e| ExecutionError::Result(format!("malformed response: {}", e)))?;

        let Some(stdout) = payload.output else {
            return Err(ExecutionError::NotReady);
        };

        Ok(ExecutionResult {
            request_id: request_id.to_string(),
            stdout,
            stderr: payload.stderr,
        })
    }
}
