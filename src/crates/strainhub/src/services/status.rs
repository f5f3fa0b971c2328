//! Status reconciliation
//!
//! Reconciles a locally stored workflow status against the engine's current
//! report. The engine is the source of truth; the store is a durable cache of
//! its last known answer.

use std::sync::Arc;

use crate::db::models::is_terminal_status;
use crate::db::repositories::WorkflowRepository;
use crate::db::{DatabasePool, StoreError};
use crate::engine::WorkflowEngine;

/// Reconciles stored workflow statuses with the execution engine
#[derive(Clone)]
pub struct StatusSynchronizer {
    pool: DatabasePool,
    engine: Arc<dyn WorkflowEngine>,
}

impl StatusSynchronizer {
    pub fn new(pool: DatabasePool, engine: Arc<dyn WorkflowEngine>) -> Self {
        Self { pool, engine }
    }

    /// Return the most recent known status of a workflow
    ///
    /// The remote engine is queried on every call. A failed query is treated
    /// as "remote status unavailable" and the stored status is returned
    /// unchanged; a transient polling failure must not corrupt durable state.
    /// A divergent remote status is written back before it is returned, and a
    /// write failure is fatal to the operation.
    pub async fn get_status(
        &self,
        email: &str,
        workflow_id: &str,
    ) -> Result<String, StoreError> {
        let stored = WorkflowRepository::status(&self.pool, email, workflow_id).await?;

        let remote = match self.engine.status(workflow_id).await {
            Ok(remote) => remote.status,
            Err(e) => {
                tracing::debug!(
                    "Engine status query for {} failed ({}); returning stored status",
                    workflow_id,
                    e
                );
                return Ok(stored);
            }
        };

        if remote != stored {
            // Stamped in the same statement as the status so a poll can never
            // record a terminal status without its timestamp.
            let finished = is_terminal_status(&remote).then(|| chrono::Utc::now().to_rfc3339());
            WorkflowRepository::set_status(
                &self.pool,
                email,
                workflow_id,
                &remote,
                finished.as_deref(),
            )
            .await?;
            tracing::info!("Workflow {} advanced {} -> {}", workflow_id, stored, remote);
        }

        Ok(remote)
    }
}
