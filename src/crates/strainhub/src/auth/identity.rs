//! Identity provider client
//!
//! Verifies short-lived identity tokens against the provider's tokeninfo
//! endpoint and checks they were issued for this system's client id.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::auth::AuthError;

/// The verified identity a request acts as
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Verified email address
    pub email: String,
}

/// Identity token verification seam
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a bearer token and return the principal it identifies
    async fn verify(&self, token: &str) -> Result<Principal, AuthError>;
}

/// Tokeninfo response payload (only the fields this system reads)
#[derive(Debug, Deserialize)]
struct TokenInfo {
    email: Option<String>,
    aud: Option<String>,
}

/// Identity verifier backed by an HTTP tokeninfo endpoint
pub struct HttpIdentityVerifier {
    http: reqwest::Client,
    tokeninfo_url: String,
    client_id: String,
}

impl HttpIdentityVerifier {
    pub fn new(tokeninfo_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokeninfo_url: tokeninfo_url.into(),
            client_id: client_id.into(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let response = self
            .http
            .get(&self.tokeninfo_url)
            .query(&[("id_token", token)])
            .send()
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {}
            // The provider reports malformed and expired tokens as client errors.
            status if status.is_client_error() => {
                return Err(AuthError::InvalidToken(format!(
                    "Provider rejected token: {}",
                    status
                )));
            }
            status => {
                return Err(AuthError::Provider(format!(
                    "Unexpected provider response: {}",
                    status
                )));
            }
        }

        let info: TokenInfo = response
            .json()
            .await
            .map_err(|e| AuthError::Provider(format!("Malformed tokeninfo payload: {}", e)))?;

        if info.aud.as_deref() != Some(self.client_id.as_str()) {
            tracing::warn!("Token verified but audience does not match client id");
            return Err(AuthError::AudienceMismatch);
        }

        let email = info
            .email
            .ok_or_else(|| AuthError::InvalidToken("Token payload has no email".to_string()))?;

        Ok(Principal { email })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokeninfo_payload_shape() {
        let info: TokenInfo = serde_json::from_str(
            r#"{"aud": "client-id", "email": "ok@example.com", "exp": "1745000000"}"#,
        )
        .unwrap();
        assert_eq!(info.email.as_deref(), Some("ok@example.com"));
        assert_eq!(info.aud.as_deref(), Some("client-id"));
    }

    #[test]
    fn test_tokeninfo_payload_missing_fields() {
        let info: TokenInfo = serde_json::from_str(r#"{"sub": "12345"}"#).unwrap();
        assert!(info.email.is_none());
        assert!(info.aud.is_none());
    }
}
