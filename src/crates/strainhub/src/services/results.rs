//! Result retrieval
//!
//! Fetches a workflow's output object from storage with the user's bound
//! credential and decodes it into abundances via the algorithm registry.

use std::sync::Arc;
use thiserror::Error;

use crate::auth::CredentialBinder;
use crate::db::{DatabasePool, StoreError};
use crate::results::{Abundances, DecoderRegistry};
use crate::storage::{ObjectStore, StorageError};

/// Result retrieval failure
#[derive(Debug, Error)]
pub enum ResultError {
    /// Principal verified but no long-lived credential is bound
    #[error("No credential bound for user")]
    MissingCredential,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Location of a workflow's output object within a bucket
#[derive(Debug, Clone)]
pub struct ResultLocation {
    pub bucket: String,
    pub algorithm: String,
    pub workflow_id: String,
    pub folder: String,
    pub species: String,
}

impl ResultLocation {
    /// Output path convention used by the shipped workflow definitions
    pub fn object_path(&self) -> String {
        format!(
            "{}/{}/{}/outputdir/abund.txt",
            self.algorithm, self.workflow_id, self.folder
        )
    }
}

/// Fetches and decodes workflow result objects
#[derive(Clone)]
pub struct ResultRetriever {
    pool: DatabasePool,
    binder: CredentialBinder,
    storage: Arc<dyn ObjectStore>,
    registry: DecoderRegistry,
}

impl ResultRetriever {
    pub fn new(
        pool: DatabasePool,
        binder: CredentialBinder,
        storage: Arc<dyn ObjectStore>,
        registry: DecoderRegistry,
    ) -> Self {
        Self {
            pool,
            binder,
            storage,
            registry,
        }
    }

    /// Fetch and decode the result object for a workflow
    pub async fn get_result(
        &self,
        email: &str,
        location: &ResultLocation,
    ) -> Result<Abundances, ResultError> {
        let credential = self
            .binder
            .bind_credential(&self.pool, email)
            .await?
            .ok_or(ResultError::MissingCredential)?;

        let bytes = self
            .storage
            .get_object(&location.bucket, &location.object_path(), &credential)
            .await?;
        let raw = String::from_utf8_lossy(&bytes);

        Ok(self
            .registry
            .decode(&location.algorithm, &raw, &location.species)
            .await)
    }
}
