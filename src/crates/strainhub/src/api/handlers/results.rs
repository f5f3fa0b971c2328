//! Result retrieval endpoint handler

use axum::{
    extract::{Path, State},
    http::HeaderMap,
};

use crate::api::{bearer_token, error::ApiResult, response, routes::AppState};
use crate::services::ResultLocation;

/// Fetch and decode a workflow's result object
///
/// GET /api/v1/results/bucket/:bucket/algorithm/:algorithm/workflow/:workflow_id/folder/:folder/species/:species
///
/// Returns per-strain relative abundances keyed by display name. An output
/// the decoder cannot interpret yields an empty map rather than an error.
pub async fn get_result(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Path((bucket, algorithm, workflow_id, folder, species)): Path<(
        String,
        String,
        String,
        String,
        String,
    )>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let principal = app_state
        .binder
        .resolve_principal(bearer_token(&headers))
        .await?;

    let location = ResultLocation {
        bucket,
        algorithm,
        workflow_id,
        folder,
        species,
    };

    let abundances = app_state
        .retriever
        .get_result(&principal.email, &location)
        .await?;

    Ok(response::ok(abundances))
}
