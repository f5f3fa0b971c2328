//! Workflow submission payload construction
//!
//! A submission carries the algorithm's workflow definition source, the
//! run-specific input parameters, and an options document with the user's
//! long-lived credential so the engine can itself act against storage.

use std::path::{Path, PathBuf};

use crate::engine::EngineError;

/// Workflow definition language the engine accepts
pub const WORKFLOW_TYPE: &str = "WDL";
/// Definition language version of the shipped algorithm scripts
pub const WORKFLOW_TYPE_VERSION: &str = "draft-2";

/// A fully assembled engine submission
#[derive(Debug, Clone)]
pub struct Submission {
    /// Workflow definition source text
    pub source: String,
    /// Input parameter document
    pub inputs: serde_json::Value,
    /// Options document carrying the credential
    pub options: serde_json::Value,
}

impl Submission {
    /// Build a submission for an algorithm, reading its workflow definition
    /// from the algorithm directory
    ///
    /// Fails with `EngineError::NotFound` when no definition exists for the
    /// algorithm: an unknown algorithm name must not reach the engine.
    pub async fn build(
        algorithm_dir: impl AsRef<Path>,
        algorithm: &str,
        inputs: serde_json::Value,
        credential: &str,
    ) -> Result<Self, EngineError> {
        let source = load_definition(algorithm_dir.as_ref(), algorithm).await?;

        Ok(Self {
            source,
            inputs,
            options: serde_json::json!({ "refresh_token": credential }),
        })
    }
}

/// Path of an algorithm's workflow definition under the data directory
pub fn definition_path(algorithm_dir: &Path, algorithm: &str) -> PathBuf {
    algorithm_dir
        .join("wdl-scripts")
        .join(format!("{}.wdl", algorithm))
}

async fn load_definition(algorithm_dir: &Path, algorithm: &str) -> Result<String, EngineError> {
    let path = definition_path(algorithm_dir, algorithm);
    match tokio::fs::read_to_string(&path).await {
        Ok(source) => Ok(source),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(EngineError::NotFound(format!(
            "No workflow definition for algorithm {}",
            algorithm
        ))),
        Err(e) => Err(EngineError::Unreachable(format!(
            "Failed to read workflow definition {}: {}",
            path.display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_build_reads_definition_and_wraps_credential() {
        let dir = tempfile::tempdir().unwrap();
        let scripts = dir.path().join("wdl-scripts");
        std::fs::create_dir_all(&scripts).unwrap();
        std::fs::write(scripts.join("StrainEst.wdl"), "workflow StrainEst {}").unwrap();

        let submission = Submission::build(
            dir.path(),
            "StrainEst",
            serde_json::json!({ "StrainEst.accession": "SRR172903" }),
            "1//refresh",
        )
        .await
        .unwrap();

        assert_eq!(submission.source, "workflow StrainEst {}");
        assert_eq!(submission.options["refresh_token"], "1//refresh");
        assert_eq!(submission.inputs["StrainEst.accession"], "SRR172903");
    }

    #[tokio::test]
    async fn test_build_unknown_algorithm() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("wdl-scripts")).unwrap();

        let err = Submission::build(dir.path(), "NoSuchAlgo", serde_json::json!({}), "cred")
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
