//! Workflow listing and lifecycle endpoint handlers

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{
    bearer_token, error::ApiResult, models::WorkflowResponse, response, routes::AppState,
};
use crate::db::repositories::WorkflowRepository;

/// Status of a single workflow as reported to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStatusResponse {
    pub id: String,
    pub status: String,
}

/// List the caller's workflows, newest first
///
/// GET /api/v1/workflows
pub async fn list_workflows(
    State(app_state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<impl axum::response::IntoResponse> {
    let principal = app_state
        .binder
        .resolve_principal(bearer_token(&headers))
        .await?;

    let mut records = WorkflowRepository::list(app_state.db.pool(), &principal.email).await?;
    records.reverse();

    let mut responses = Vec::with_capacity(records.len());
    for record in records {
        let tree = app_state.trees.tree_for(&record.species).await;
        responses.push(WorkflowResponse::from_record(record, tree));
    }

    Ok(response::ok(responses))
}

/// Report the current status of one of the caller's workflows
///
/// GET /api/v1/workflows/:workflow_id/status
///
/// Reconciles the stored status against the engine before answering.
pub async fn workflow_status(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path(workflow_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let principal = app_state
        .binder
        .resolve_principal(bearer_token(&headers))
        .await?;

    let status = app_state
        .synchronizer
        .get_status(&principal.email, &workflow_id)
        .await?;

    Ok(response::ok(WorkflowStatusResponse {
        id: workflow_id,
        status,
    }))
}

/// Fetch a workflow's outputs from the engine
///
/// GET /api/v1/workflows/:workflow_id/outputs
pub async fn workflow_outputs(
    State(app_state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let outputs = app_state.engine.outputs(&workflow_id).await?;
    Ok(Json(outputs))
}

/// Ask the engine to abort a running workflow
///
/// POST /api/v1/workflows/:workflow_id/abort
pub async fn abort_workflow(
    State(app_state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let aborted = app_state.engine.abort(&workflow_id).await?;
    tracing::info!("Abort requested for workflow {}", workflow_id);
    Ok(response::ok(aborted))
}
