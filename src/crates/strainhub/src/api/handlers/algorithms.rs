//! Algorithm catalogue endpoint handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::{
    error::{ApiError, ApiResult},
    response,
    routes::AppState,
};

/// Catalogue of runnable algorithms
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmListResponse {
    pub algorithms: Vec<String>,
}

/// List the algorithms this deployment can run
///
/// GET /api/v1/algorithms
///
/// An algorithm is runnable iff a workflow definition for it is shipped in
/// the data directory.
pub async fn list_algorithms(
    State(app_state): State<AppState>,
) -> ApiResult<impl axum::response::IntoResponse> {
    let dir = app_state.algorithm_dir.join("wdl-scripts");
    let mut entries = tokio::fs::read_dir(&dir)
        .await
        .map_err(|e| ApiError::Internal(format!("Cannot read definition directory: {}", e)))?;

    let mut algorithms = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| ApiError::Internal(format!("Cannot read definition directory: {}", e)))?
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("wdl") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                algorithms.push(stem.to_string());
            }
        }
    }
    algorithms.sort();

    Ok(response::ok(AlgorithmListResponse { algorithms }))
}

/// List the reference species an algorithm supports
///
/// GET /api/v1/algorithms/:algorithm/species
///
/// The species list is maintained as a JSON document alongside the
/// algorithm's data files and returned verbatim.
pub async fn list_species(
    State(app_state): State<AppState>,
    Path(algorithm): Path<String>,
) -> ApiResult<Json<serde_json::Value>> {
    let path = app_state
        .algorithm_dir
        .join(&algorithm)
        .join("species")
        .join(format!("{}.json", algorithm));

    let raw = tokio::fs::read_to_string(&path).await.map_err(|_| {
        ApiError::NotFound(format!("No species list for algorithm {}", algorithm))
    })?;

    let species: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| ApiError::Internal(format!("Malformed species list: {}", e)))?;

    Ok(Json(species))
}
