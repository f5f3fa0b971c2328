//! API route definitions

use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::auth::CredentialBinder;
use crate::db::DatabaseConnection;
use crate::engine::WorkflowEngine;
use crate::results::{DecoderRegistry, StrainEstDecoder, TreeLookup};
use crate::services::{ResultRetriever, StatusSynchronizer, WorkflowSubmitter};
use crate::storage::ObjectStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub binder: CredentialBinder,
    pub engine: Arc<dyn WorkflowEngine>,
    pub storage: Arc<dyn ObjectStore>,
    pub submitter: WorkflowSubmitter,
    pub synchronizer: StatusSynchronizer,
    pub retriever: ResultRetriever,
    pub trees: TreeLookup,
    pub algorithm_dir: PathBuf,
    pub project_id: String,
}

impl AppState {
    /// Wire the services over the injected collaborators
    pub fn new(
        db: DatabaseConnection,
        binder: CredentialBinder,
        engine: Arc<dyn WorkflowEngine>,
        storage: Arc<dyn ObjectStore>,
        algorithm_dir: impl Into<PathBuf>,
        project_id: impl Into<String>,
    ) -> Self {
        let algorithm_dir = algorithm_dir.into();
        let project_id = project_id.into();
        let trees = TreeLookup::new(&algorithm_dir);

        let registry = DecoderRegistry::new()
            .register("StrainEst", Arc::new(StrainEstDecoder::new(&algorithm_dir)));

        let submitter = WorkflowSubmitter::new(
            db.pool().clone(),
            engine.clone(),
            trees.clone(),
            &algorithm_dir,
            &project_id,
        );
        let synchronizer = StatusSynchronizer::new(db.pool().clone(), engine.clone());
        let retriever = ResultRetriever::new(
            db.pool().clone(),
            binder.clone(),
            storage.clone(),
            registry,
        );

        Self {
            db,
            binder,
            engine,
            storage,
            submitter,
            synchronizer,
            retriever,
            trees,
            algorithm_dir,
            project_id,
        }
    }
}

/// Build the complete API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health))
        // Auth endpoints
        .route("/api/v1/auth/login", post(handlers::login))
        // Algorithm catalogue
        .route("/api/v1/algorithms", get(handlers::list_algorithms))
        .route(
            "/api/v1/algorithms/:algorithm/species",
            get(handlers::list_species),
        )
        // Computation launch
        .route("/api/v1/compute", post(handlers::submit_compute))
        // Workflow endpoints
        .route("/api/v1/workflows", get(handlers::list_workflows))
        .route(
            "/api/v1/workflows/:workflow_id/status",
            get(handlers::workflow_status),
        )
        .route(
            "/api/v1/workflows/:workflow_id/outputs",
            get(handlers::workflow_outputs),
        )
        .route(
            "/api/v1/workflows/:workflow_id/abort",
            post(handlers::abort_workflow),
        )
        // Result retrieval
        .route(
            "/api/v1/results/bucket/:bucket/algorithm/:algorithm/workflow/:workflow_id/folder/:folder/species/:species",
            get(handlers::get_result),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
