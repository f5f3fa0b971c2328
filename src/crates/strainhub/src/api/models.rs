//! API request and response DTOs

use serde::{Deserialize, Serialize};

use crate::db::models::WorkflowRecord;
use crate::services::SubmittedWorkflow;

/// Request to register/refresh a user after the authorization exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Long-lived credential obtained from the identity provider; absent on
    /// a plain re-login where the provider issued no new one
    pub credential: Option<String>,
}

/// Login outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub email: String,
    /// Whether a new user record was created
    pub created: bool,
}

/// Request to launch a computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeRequest {
    /// Algorithm identifier, e.g. "StrainEst"
    pub algorithm: String,
    /// Workflow input parameters, keyed by algorithm-prefixed names
    pub inputs: serde_json::Value,
}

impl ComputeRequest {
    pub fn validate(&self) -> crate::api::error::ApiResult<()> {
        if self.algorithm.is_empty() {
            return Err(crate::api::error::ApiError::BadRequest(
                "algorithm is required".to_string(),
            ));
        }
        if !self.inputs.is_object() {
            return Err(crate::api::error::ApiError::BadRequest(
                "inputs must be a JSON object".to_string(),
            ));
        }
        Ok(())
    }
}

/// Workflow as returned to clients, with display data attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowResponse {
    #[serde(rename = "workflowId")]
    pub workflow_id: String,
    pub submitted: String,
    pub finished: Option<String>,
    pub algorithm: String,
    pub species: String,
    #[serde(rename = "projectId")]
    pub project_id: String,
    #[serde(rename = "sampleName")]
    pub sample_name: String,
    pub single: bool,
    pub status: String,
    /// Reference phylogenetic tree for display, empty if none stored
    #[serde(rename = "nwkTree")]
    pub nwk_tree: String,
}

impl WorkflowResponse {
    pub fn from_record(record: WorkflowRecord, nwk_tree: String) -> Self {
        Self {
            workflow_id: record.workflow_id,
            submitted: record.submitted,
            finished: record.finished,
            algorithm: record.algorithm,
            species: record.species,
            project_id: record.project_id,
            sample_name: record.sample_name,
            single: record.single,
            status: record.status,
            nwk_tree,
        }
    }

    pub fn from_submission(submitted: SubmittedWorkflow) -> Self {
        Self::from_record(submitted.record, submitted.tree)
    }
}
