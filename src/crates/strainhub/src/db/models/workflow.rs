//! Workflow record model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Status assigned locally at submission time. Every later value comes from
/// the execution engine.
pub const STATUS_SUBMITTED: &str = "Submitted";

/// Represents one submitted analysis job in a user's history.
///
/// The `workflow_id` is assigned by the execution engine and is unique within
/// a user's workflow list. The status string mirrors the engine's vocabulary
/// (Submitted, Running, Succeeded, Failed, Aborted).
///
/// # Timestamps
/// All timestamp fields are ISO8601 strings due to SQLite type limitations.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkflowRecord {
    /// Engine-assigned workflow identifier
    pub workflow_id: String,

    /// Submission timestamp (ISO8601 string)
    pub submitted: String,

    /// Completion timestamp, None until the workflow reaches a terminal state
    pub finished: Option<String>,

    /// Algorithm identifier, e.g. "StrainEst"
    pub algorithm: String,

    /// Reference species identifier, e.g. "ecoli"
    pub species: String,

    /// Cloud project the job is billed to
    pub project_id: String,

    /// Sample accession or name
    pub sample_name: String,

    /// Single-ended (true) vs paired-ended (false) reads
    pub single: bool,

    /// Current workflow status
    pub status: String,
}

impl WorkflowRecord {
    /// Create a record for a freshly submitted workflow
    pub fn submitted_now(
        workflow_id: impl Into<String>,
        algorithm: impl Into<String>,
        species: impl Into<String>,
        project_id: impl Into<String>,
        sample_name: impl Into<String>,
        single: bool,
    ) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            submitted: chrono::Utc::now().to_rfc3339(),
            finished: None,
            algorithm: algorithm.into(),
            species: species.into(),
            project_id: project_id.into(),
            sample_name: sample_name.into(),
            single,
            status: STATUS_SUBMITTED.to_string(),
        }
    }

    /// Check whether the status is one the engine no longer advances
    pub fn is_terminal(&self) -> bool {
        is_terminal_status(&self.status)
    }
}

/// Terminal statuses per the engine's vocabulary
pub fn is_terminal_status(status: &str) -> bool {
    matches!(status, "Succeeded" | "Failed" | "Aborted")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submitted_record_defaults() {
        let record = WorkflowRecord::submitted_now(
            "014b5fb7-0320-4e15-be77-f7f239b9cb36",
            "StrainEst",
            "ecoli",
            "grand-bridge-276413",
            "SRR172903",
            true,
        );

        assert_eq!(record.status, STATUS_SUBMITTED);
        assert!(record.finished.is_none());
        assert!(!record.is_terminal());
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(is_terminal_status("Succeeded"));
        assert!(is_terminal_status("Failed"));
        assert!(is_terminal_status("Aborted"));
        assert!(!is_terminal_status("Running"));
        assert!(!is_terminal_status("Submitted"));
    }
}
