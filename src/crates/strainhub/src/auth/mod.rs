//! Identity verification and credential binding
//!
//! Two distinct concerns live here. Identity verification turns a short-lived
//! bearer token into a verified principal (an email). Credential binding looks
//! up that principal's stored long-lived credential so outbound calls to the
//! execution engine and object storage can act on the user's behalf. The two
//! fail for different reasons and callers must be able to tell them apart: a
//! newly authenticated user may simply have no credential stored yet.

pub mod identity;

pub use identity::{HttpIdentityVerifier, IdentityVerifier, Principal};

use std::sync::Arc;
use thiserror::Error;

use crate::db::repositories::UserRepository;
use crate::db::{DatabasePool, StoreError};

/// Authentication failure
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on the request
    #[error("Missing identity token")]
    MissingToken,

    /// Token malformed, expired, or rejected by the identity provider
    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    /// Token verified for a different audience than this system
    #[error("Token audience mismatch")]
    AudienceMismatch,

    /// Identity provider unreachable or returned an unexpected failure
    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Verifies identity tokens and resolves stored credentials.
///
/// Gates every principal-scoped operation: no mutating call proceeds without
/// a resolved principal, and storage-facing calls additionally require a
/// bound credential.
#[derive(Clone)]
pub struct CredentialBinder {
    verifier: Arc<dyn IdentityVerifier>,
}

impl CredentialBinder {
    pub fn new(verifier: Arc<dyn IdentityVerifier>) -> Self {
        Self { verifier }
    }

    /// Verify an identity token and return the principal it belongs to
    pub async fn resolve_principal(&self, token: Option<&str>) -> Result<Principal, AuthError> {
        let token = token.ok_or(AuthError::MissingToken)?;
        if token.is_empty() {
            return Err(AuthError::MissingToken);
        }
        self.verifier.verify(token).await
    }

    /// Look up the stored long-lived credential for a principal
    ///
    /// `Ok(None)` means identity verification succeeded but no credential is
    /// bound (new or unlinked user); callers treat the operation as
    /// unauthorized without conflating it with a rejected token.
    pub async fn bind_credential(
        &self,
        pool: &DatabasePool,
        email: &str,
    ) -> Result<Option<String>, StoreError> {
        UserRepository::credential(pool, email).await
    }
}
