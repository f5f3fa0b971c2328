//! Computation launch endpoint handler

use axum::{extract::State, http::HeaderMap, Json};

use crate::api::{
    bearer_token,
    error::{ApiError, ApiResult},
    models::{ComputeRequest, WorkflowResponse},
    response,
    routes::AppState,
};

/// Launch a computation on behalf of the caller
///
/// POST /api/v1/compute
///
/// Verifies the caller, requires a bound credential (the engine runs jobs
/// under it), makes sure the result bucket exists, then submits and records
/// the workflow. Returns the recorded workflow with its reference tree.
pub async fn submit_compute(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ComputeRequest>,
) -> ApiResult<impl axum::response::IntoResponse> {
    req.validate()?;

    let principal = app_state
        .binder
        .resolve_principal(bearer_token(&headers))
        .await?;

    let credential = app_state
        .binder
        .bind_credential(app_state.db.pool(), &principal.email)
        .await?
        .ok_or_else(|| {
            ApiError::Unauthorized(format!("No credential bound for {}", principal.email))
        })?;

    // The bucket holding this deployment's results may not exist on a fresh
    // project; creating it is idempotent.
    app_state
        .storage
        .ensure_bucket(&app_state.project_id, &credential)
        .await?;

    let submitted = app_state
        .submitter
        .submit(&principal.email, &req.algorithm, req.inputs, &credential)
        .await?;

    tracing::info!(
        "Submitted {} workflow {} for {}",
        submitted.record.algorithm,
        submitted.record.workflow_id,
        principal.email
    );

    Ok(response::created(WorkflowResponse::from_submission(
        submitted,
    )))
}
