//! Workflow submission
//!
//! Builds the engine submission payload from algorithm, inputs, and the
//! user's bound credential, submits it, and records the resulting workflow
//! in the user's history.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::db::models::WorkflowRecord;
use crate::db::repositories::WorkflowRepository;
use crate::db::{DatabasePool, StoreError};
use crate::engine::{EngineError, Submission, WorkflowEngine};
use crate::results::TreeLookup;

/// Workflow submission failure
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A recorded submission plus derivable display data
#[derive(Debug, Clone)]
pub struct SubmittedWorkflow {
    pub record: WorkflowRecord,
    /// Reference phylogenetic tree for the species, empty when none is stored
    pub tree: String,
}

/// Submits workflows to the execution engine and records them
#[derive(Clone)]
pub struct WorkflowSubmitter {
    pool: DatabasePool,
    engine: Arc<dyn WorkflowEngine>,
    trees: TreeLookup,
    algorithm_dir: PathBuf,
    project_id: String,
}

impl WorkflowSubmitter {
    pub fn new(
        pool: DatabasePool,
        engine: Arc<dyn WorkflowEngine>,
        trees: TreeLookup,
        algorithm_dir: impl Into<PathBuf>,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            engine,
            trees,
            algorithm_dir: algorithm_dir.into(),
            project_id: project_id.into(),
        }
    }

    /// Submit a workflow on behalf of a user
    ///
    /// The caller has already resolved the principal and bound the
    /// credential; nothing here runs without one.
    pub async fn submit(
        &self,
        email: &str,
        algorithm: &str,
        inputs: serde_json::Value,
        credential: &str,
    ) -> Result<SubmittedWorkflow, SubmitError> {
        // Run parameters the record keeps are carried inside the inputs
        // document under algorithm-prefixed keys.
        let species = input_str(&inputs, algorithm, "referenceSpecies");
        let sample_name = input_str(&inputs, algorithm, "accession");
        let single = inputs
            .get(format!("{}.single", algorithm))
            .and_then(|v| v.as_bool())
            .unwrap_or(false);

        let submission =
            Submission::build(&self.algorithm_dir, algorithm, inputs, credential).await?;
        let accepted = self.engine.submit(submission).await?;

        let record = WorkflowRecord::submitted_now(
            &accepted.id,
            algorithm,
            &species,
            &self.project_id,
            &sample_name,
            single,
        );

        if let Err(e) = WorkflowRepository::append(&self.pool, email, &record).await {
            if e.is_conflict() {
                // The job is running remotely with no fresh local record; loud
                // failure beats silently handing back a record for a different
                // submission with the same id.
                tracing::error!(
                    "Engine accepted workflow {} for {} but a record with that id already exists",
                    accepted.id,
                    email
                );
            }
            return Err(e.into());
        }

        tracing::info!("Recorded workflow {} for {}", record.workflow_id, email);

        // Display data only: a missing tree never fails the submission.
        let tree = self.trees.tree_for(&record.species).await;

        Ok(SubmittedWorkflow { record, tree })
    }
}

fn input_str(inputs: &serde_json::Value, algorithm: &str, key: &str) -> String {
    inputs
        .get(format!("{}.{}", algorithm, key))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::STATUS_SUBMITTED;
    use crate::engine::{EngineStatus, EngineSubmitResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeEngine {
        next_id: String,
        submissions: AtomicUsize,
    }

    impl FakeEngine {
        fn accepting(id: &str) -> Self {
            Self {
                next_id: id.to_string(),
                submissions: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl WorkflowEngine for FakeEngine {
        async fn submit(
            &self,
            _submission: Submission,
        ) -> Result<EngineSubmitResponse, EngineError> {
            self.submissions.fetch_add(1, Ordering::SeqCst);
            Ok(EngineSubmitResponse {
                id: self.next_id.clone(),
                status: STATUS_SUBMITTED.to_string(),
            })
        }

        async fn status(&self, _workflow_id: &str) -> Result<EngineStatus, EngineError> {
            unimplemented!("not used by submission tests")
        }

        async fn outputs(&self, _workflow_id: &str) -> Result<serde_json::Value, EngineError> {
            unimplemented!("not used by submission tests")
        }

        async fn abort(&self, _workflow_id: &str) -> Result<EngineStatus, EngineError> {
            unimplemented!("not used by submission tests")
        }
    }

    async fn setup_pool() -> DatabasePool {
        let pool = sqlx::sqlite::SqlitePool::connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE users (email TEXT PRIMARY KEY NOT NULL, credential TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE workflows (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_email TEXT NOT NULL,
                workflow_id TEXT NOT NULL,
                submitted TEXT NOT NULL,
                finished TEXT,
                algorithm TEXT NOT NULL,
                species TEXT NOT NULL,
                project_id TEXT NOT NULL,
                sample_name TEXT NOT NULL,
                single INTEGER NOT NULL,
                status TEXT NOT NULL,
                UNIQUE (user_email, workflow_id)
            )",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO users (email, credential) VALUES ('ok@example.com', '1//r')")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn write_wdl(dir: &std::path::Path) {
        let scripts = dir.join("wdl-scripts");
        std::fs::create_dir_all(&scripts).unwrap();
        std::fs::write(scripts.join("StrainEst.wdl"), "workflow StrainEst {}").unwrap();
    }

    fn sample_inputs() -> serde_json::Value {
        serde_json::json!({
            "StrainEst.referenceSpecies": "ecoli",
            "StrainEst.routeToReference": "E_coli",
            "StrainEst.accession": "SRR172903",
            "StrainEst.single": true,
        })
    }

    fn submitter(pool: DatabasePool, engine: Arc<dyn WorkflowEngine>, dir: &std::path::Path) -> WorkflowSubmitter {
        WorkflowSubmitter::new(
            pool,
            engine,
            TreeLookup::new(dir),
            dir,
            "grand-bridge-276413",
        )
    }

    #[tokio::test]
    async fn test_submit_records_workflow() {
        let pool = setup_pool().await;
        let dir = tempfile::tempdir().unwrap();
        write_wdl(dir.path());

        let submitted = submitter(
            pool.clone(),
            Arc::new(FakeEngine::accepting("wf-1")),
            dir.path(),
        )
        .submit("ok@example.com", "StrainEst", sample_inputs(), "1//r")
        .await
        .unwrap();

        assert_eq!(submitted.record.workflow_id, "wf-1");
        assert_eq!(submitted.record.status, STATUS_SUBMITTED);
        assert!(submitted.record.finished.is_none());
        assert_eq!(submitted.record.species, "ecoli");
        assert_eq!(submitted.record.sample_name, "SRR172903");
        assert!(submitted.record.single);
        assert_eq!(submitted.tree, "");

        let stored = WorkflowRepository::list(&pool, "ok@example.com")
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].workflow_id, "wf-1");
    }

    #[tokio::test]
    async fn test_submit_attaches_tree_when_present() {
        let pool = setup_pool().await;
        let dir = tempfile::tempdir().unwrap();
        write_wdl(dir.path());
        let trees = dir.path().join("phylotrees");
        std::fs::create_dir_all(&trees).unwrap();
        std::fs::write(trees.join("ecoli.nwk"), "(A:0.1,B:0.2);").unwrap();

        let submitted = submitter(
            pool,
            Arc::new(FakeEngine::accepting("wf-1")),
            dir.path(),
        )
        .submit("ok@example.com", "StrainEst", sample_inputs(), "1//r")
        .await
        .unwrap();

        assert_eq!(submitted.tree, "(A:0.1,B:0.2);");
    }

    #[tokio::test]
    async fn test_duplicate_engine_id_is_conflict() {
        let pool = setup_pool().await;
        let dir = tempfile::tempdir().unwrap();
        write_wdl(dir.path());

        let engine: Arc<dyn WorkflowEngine> = Arc::new(FakeEngine::accepting("wf-1"));
        let submitter = submitter(pool.clone(), engine, dir.path());

        submitter
            .submit("ok@example.com", "StrainEst", sample_inputs(), "1//r")
            .await
            .unwrap();
        let err = submitter
            .submit("ok@example.com", "StrainEst", sample_inputs(), "1//r")
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Store(StoreError::Conflict(_))));

        // Exactly one record survives the collision.
        let stored = WorkflowRepository::list(&pool, "ok@example.com")
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_algorithm_never_reaches_engine() {
        let pool = setup_pool().await;
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("wdl-scripts")).unwrap();

        let engine = Arc::new(FakeEngine::accepting("wf-1"));
        let err = submitter(pool, engine.clone(), dir.path())
            .submit("ok@example.com", "NoSuchAlgo", sample_inputs(), "1//r")
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Engine(EngineError::NotFound(_))));
        assert_eq!(engine.submissions.load(Ordering::SeqCst), 0);
    }
}
