//! User model for database persistence

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered user, keyed by verified email.
///
/// The credential is the long-lived token the execution engine and object
/// storage act with on the user's behalf. It stays NULL until the user
/// completes the first authorization exchange.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique email address (the principal identity)
    pub email: String,

    /// Long-lived credential, absent for new or unlinked users
    pub credential: Option<String>,
}

impl User {
    /// Create a new user with no credential bound yet
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            credential: None,
        }
    }

    /// Check whether a credential has been bound to this user
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_has_no_credential() {
        let user = User::new("ok@example.com");
        assert_eq!(user.email, "ok@example.com");
        assert!(!user.has_credential());
    }
}
