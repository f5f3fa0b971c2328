//! Object storage client
//!
//! Fetches workflow output objects with the user's bound credential and
//! ensures the engine's working bucket exists. Only the two operations this
//! system needs are modeled; this is not a general storage client.

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Object storage failure
#[derive(Debug, Error)]
pub enum StorageError {
    /// Object or bucket does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// Storage provider rejected the credential (invalid or expired)
    #[error("Storage credential rejected: {0}")]
    Unauthorized(String),

    /// Provider unreachable or returned an unexpected failure
    #[error("Storage error: {0}")]
    Upstream(String),
}

/// Object storage seam
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch raw object bytes, authorizing with the given credential
    async fn get_object(
        &self,
        bucket: &str,
        object_path: &str,
        credential: &str,
    ) -> Result<Vec<u8>, StorageError>;

    /// Create the project's working bucket if it does not exist
    ///
    /// "Already exists" is normal behaviour, not a failure.
    async fn ensure_bucket(&self, project_id: &str, credential: &str)
        -> Result<(), StorageError>;
}

/// Name of the working bucket for a project
pub fn bucket_name(project_id: &str) -> String {
    format!("cromwell-{}", project_id)
}

/// Object store backed by a storage JSON API
pub struct HttpObjectStore {
    http: reqwest::Client,
    base_url: String,
}

impl HttpObjectStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn classify(status: StatusCode, body: String) -> StorageError {
        match status {
            StatusCode::NOT_FOUND => StorageError::NotFound(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StorageError::Unauthorized(body),
            _ => StorageError::Upstream(format!("{}: {}", status, body)),
        }
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get_object(
        &self,
        bucket: &str,
        object_path: &str,
        credential: &str,
    ) -> Result<Vec<u8>, StorageError> {
        // Object names are URL-encoded in the JSON API path.
        let encoded = object_path.replace('/', "%2F");
        let url = format!("{}/b/{}/o/{}?alt=media", self.base_url, bucket, encoded);

        let response = self
            .http
            .get(&url)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|e| StorageError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // The provider reports an expired credential inside an error body
            // with a 400, not only via 401.
            if body.contains("invalid_grant") {
                return Err(StorageError::Unauthorized(body));
            }
            return Err(Self::classify(status, body));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StorageError::Upstream(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    async fn ensure_bucket(
        &self,
        project_id: &str,
        credential: &str,
    ) -> Result<(), StorageError> {
        let url = format!("{}/b?project={}", self.base_url, project_id);
        let body = serde_json::json!({ "name": bucket_name(project_id) });

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| StorageError::Upstream(e.to_string()))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Self::classify(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_name() {
        assert_eq!(bucket_name("grand-bridge-276413"), "cromwell-grand-bridge-276413");
    }

    #[test]
    fn test_status_classification() {
        assert!(matches!(
            HttpObjectStore::classify(StatusCode::NOT_FOUND, String::new()),
            StorageError::NotFound(_)
        ));
        assert!(matches!(
            HttpObjectStore::classify(StatusCode::UNAUTHORIZED, String::new()),
            StorageError::Unauthorized(_)
        ));
        assert!(matches!(
            HttpObjectStore::classify(StatusCode::FORBIDDEN, String::new()),
            StorageError::Unauthorized(_)
        ));
        assert!(matches!(
            HttpObjectStore::classify(StatusCode::BAD_GATEWAY, String::new()),
            StorageError::Upstream(_)
        ));
    }
}
