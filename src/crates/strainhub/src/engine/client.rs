//! Cromwell REST API client
//!
//! See https://cromwell.readthedocs.io/en/stable/api/RESTAPI/ for the wire
//! schema this client speaks.

use async_trait::async_trait;
use reqwest::multipart;
use serde::{Deserialize, Serialize};

use crate::engine::submission::{Submission, WORKFLOW_TYPE, WORKFLOW_TYPE_VERSION};
use crate::engine::EngineError;

/// Engine response to a submission: the assigned id plus initial status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSubmitResponse {
    pub id: String,
    pub status: String,
}

/// Engine status report for a workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub id: String,
    pub status: String,
}

/// Execution engine seam
///
/// Implemented over HTTP in production and by in-memory fakes in service
/// tests; injected explicitly instead of reached through ambient state.
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    /// Submit a workflow for execution
    async fn submit(&self, submission: Submission) -> Result<EngineSubmitResponse, EngineError>;

    /// Query the live status of a workflow
    async fn status(&self, workflow_id: &str) -> Result<EngineStatus, EngineError>;

    /// Fetch the outputs of a workflow (available even before completion)
    async fn outputs(&self, workflow_id: &str) -> Result<serde_json::Value, EngineError>;

    /// Ask the engine to abort a running workflow
    async fn abort(&self, workflow_id: &str) -> Result<EngineStatus, EngineError>;
}

/// HTTP client for a Cromwell server
pub struct CromwellClient {
    http: reqwest::Client,
    base_url: String,
}

impl CromwellClient {
    /// Create a client for the engine at the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}api/workflows/v1{}", self.base_url, suffix)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, EngineError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EngineError::from_status(status.as_u16(), body));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| EngineError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl WorkflowEngine for CromwellClient {
    async fn submit(&self, submission: Submission) -> Result<EngineSubmitResponse, EngineError> {
        let form = multipart::Form::new()
            .part(
                "workflowSource",
                multipart::Part::text(submission.source).file_name("workflow.wdl"),
            )
            .part(
                "workflowInputs",
                multipart::Part::text(submission.inputs.to_string()).file_name("inputs.json"),
            )
            .part(
                "workflowOptions",
                multipart::Part::text(submission.options.to_string()).file_name("options.json"),
            )
            .text("workflowType", WORKFLOW_TYPE)
            .text("workflowTypeVersion", WORKFLOW_TYPE_VERSION);

        let response = self
            .http
            .post(self.url(""))
            .multipart(form)
            .send()
            .await
            .map_err(|e| EngineError::Unreachable(e.to_string()))?;

        let submitted: EngineSubmitResponse = Self::decode(response).await?;
        tracing::info!("Engine accepted workflow {}", submitted.id);
        Ok(submitted)
    }

    async fn status(&self, workflow_id: &str) -> Result<EngineStatus, EngineError> {
        let response = self
            .http
            .get(self.url(&format!("/{}/status", workflow_id)))
            .send()
            .await
            .map_err(|e| EngineError::Unreachable(e.to_string()))?;

        Self::decode(response).await
    }

    async fn outputs(&self, workflow_id: &str) -> Result<serde_json::Value, EngineError> {
        let response = self
            .http
            .get(self.url(&format!("/{}/outputs", workflow_id)))
            .send()
            .await
            .map_err(|e| EngineError::Unreachable(e.to_string()))?;

        Self::decode(response).await
    }

    async fn abort(&self, workflow_id: &str) -> Result<EngineStatus, EngineError> {
        let response = self
            .http
            .post(self.url(&format!("/{}/abort", workflow_id)))
            .send()
            .await
            .map_err(|e| EngineError::Unreachable(e.to_string()))?;

        let aborted: EngineStatus = Self::decode(response).await?;
        tracing::info!("Engine aborting workflow {}: {}", aborted.id, aborted.status);
        Ok(aborted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let with_slash = CromwellClient::new("http://localhost:8000/");
        let without = CromwellClient::new("http://localhost:8000");

        assert_eq!(
            with_slash.url("/abc/status"),
            "http://localhost:8000/api/workflows/v1/abc/status"
        );
        assert_eq!(with_slash.url(""), without.url(""));
    }

    #[test]
    fn test_status_payload_shape() {
        let status: EngineStatus = serde_json::from_str(
            r#"{"id": "014b5fb7-0320-4e15-be77-f7f239b9cb36", "status": "Running"}"#,
        )
        .unwrap();
        assert_eq!(status.status, "Running");
    }
}
