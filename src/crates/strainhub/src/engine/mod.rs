//! Execution engine client
//!
//! The engine is an external Cromwell-style service that runs submitted
//! workflow definitions. It is reached through an explicit client constructed
//! once from configuration and injected wherever submission or status
//! reconciliation happens.

pub mod client;
pub mod submission;

pub use client::{CromwellClient, EngineStatus, EngineSubmitResponse, WorkflowEngine};
pub use submission::Submission;

use thiserror::Error;

/// Execution engine failure
#[derive(Debug, Error)]
pub enum EngineError {
    /// Engine unreachable (connection refused, timeout, DNS failure)
    #[error("Engine unreachable: {0}")]
    Unreachable(String),

    /// Engine does not know the workflow id
    #[error("Workflow not found by engine: {0}")]
    NotFound(String),

    /// Engine refused the operation (e.g. aborting a completed workflow)
    #[error("Engine refused the operation: {0}")]
    Forbidden(String),

    /// Engine returned an unexpected non-success response
    #[error("Engine returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// Engine response could not be decoded
    #[error("Malformed engine response: {0}")]
    Malformed(String),
}

impl EngineError {
    /// Classify a non-success HTTP status from the engine
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            403 => EngineError::Forbidden(body),
            404 => EngineError::NotFound(body),
            _ => EngineError::Rejected { status, body },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            EngineError::from_status(404, "gone".into()),
            EngineError::NotFound(_)
        ));
        assert!(matches!(
            EngineError::from_status(403, "completed".into()),
            EngineError::Forbidden(_)
        ));
        assert!(matches!(
            EngineError::from_status(500, "boom".into()),
            EngineError::Rejected { status: 500, .. }
        ));
    }
}
