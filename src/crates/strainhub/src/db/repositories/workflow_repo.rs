//! Workflow repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{StoreError, StoreResult};
use crate::db::models::WorkflowRecord;

const WORKFLOW_COLUMNS: &str = "workflow_id, submitted, finished, algorithm, species, \
                                project_id, sample_name, single, status";

/// Repository for managing a user's workflow history
pub struct WorkflowRepository;

impl WorkflowRepository {
    /// Append a workflow to a user's history
    ///
    /// Fails with `StoreError::NotFound` if the user does not exist and with
    /// `StoreError::Conflict` if the user already has a workflow with the same
    /// engine id. The UNIQUE constraint decides the loser of a concurrent
    /// duplicate submission.
    pub async fn append(
        pool: &DatabasePool,
        email: &str,
        workflow: &WorkflowRecord,
    ) -> StoreResult<()> {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found(format!("No such user: {}", email)));
        }

        sqlx::query(
            "INSERT INTO workflows (user_email, workflow_id, submitted, finished, algorithm, \
             species, project_id, sample_name, single, status)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(email)
        .bind(&workflow.workflow_id)
        .bind(&workflow.submitted)
        .bind(&workflow.finished)
        .bind(&workflow.algorithm)
        .bind(&workflow.species)
        .bind(&workflow.project_id)
        .bind(&workflow.sample_name)
        .bind(workflow.single)
        .bind(&workflow.status)
        .execute(pool)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::Conflict(_) => StoreError::conflict(format!(
                "Workflow with id {} already exists for {}",
                workflow.workflow_id, email
            )),
            other => other,
        })?;

        Ok(())
    }

    /// List a user's workflows in insertion order
    ///
    /// Fails with `StoreError::NotFound` if the user does not exist; a user
    /// with no workflows gets an empty list.
    pub async fn list(pool: &DatabasePool, email: &str) -> StoreResult<Vec<WorkflowRecord>> {
        let exists: Option<(i64,)> = sqlx::query_as("SELECT 1 FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        if exists.is_none() {
            return Err(StoreError::not_found(format!("No such user: {}", email)));
        }

        let workflows = sqlx::query_as::<_, WorkflowRecord>(&format!(
            "SELECT {} FROM workflows WHERE user_email = ? ORDER BY id ASC",
            WORKFLOW_COLUMNS
        ))
        .bind(email)
        .fetch_all(pool)
        .await?;

        Ok(workflows)
    }

    /// Find one of a user's workflows by engine id
    pub async fn find(
        pool: &DatabasePool,
        email: &str,
        workflow_id: &str,
    ) -> StoreResult<Option<WorkflowRecord>> {
        let workflow = sqlx::query_as::<_, WorkflowRecord>(&format!(
            "SELECT {} FROM workflows WHERE user_email = ? AND workflow_id = ?",
            WORKFLOW_COLUMNS
        ))
        .bind(email)
        .bind(workflow_id)
        .fetch_optional(pool)
        .await?;

        Ok(workflow)
    }

    /// Get the stored status of a workflow
    ///
    /// Fails with `StoreError::NotFound` if the user has no workflow with the
    /// given id.
    pub async fn status(
        pool: &DatabasePool,
        email: &str,
        workflow_id: &str,
    ) -> StoreResult<String> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT status FROM workflows WHERE user_email = ? AND workflow_id = ?",
        )
        .bind(email)
        .bind(workflow_id)
        .fetch_optional(pool)
        .await?;

        row.map(|(status,)| status).ok_or_else(|| {
            StoreError::not_found(format!(
                "No workflow {} for user {}",
                workflow_id, email
            ))
        })
    }

    /// Update the stored status of a workflow, stamping the completion
    /// timestamp in the same statement when one is given
    ///
    /// The stamp is write-once: an already-recorded `finished` is kept. A
    /// single UPDATE means a poll can never record a terminal status without
    /// its timestamp. Fails with `StoreError::NotFound` if the user or
    /// workflow is absent.
    pub async fn set_status(
        pool: &DatabasePool,
        email: &str,
        workflow_id: &str,
        status: &str,
        finished: Option<&str>,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE workflows SET status = ?, finished = COALESCE(finished, ?)
             WHERE user_email = ? AND workflow_id = ?",
        )
        .bind(status)
        .bind(finished)
        .bind(email)
        .bind(workflow_id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(format!(
                "No workflow {} for user {}",
                workflow_id, email
            )));
        }

        Ok(())
    }
}
