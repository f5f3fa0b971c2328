//! User repository for database operations

use crate::db::connection::DatabasePool;
use crate::db::error::{StoreError, StoreResult};
use crate::db::models::User;

/// Repository for managing user records
pub struct UserRepository;

impl UserRepository {
    /// Create a new user with no credential bound
    ///
    /// Fails with `StoreError::Conflict` if the email is already registered.
    pub async fn create(pool: &DatabasePool, email: &str) -> StoreResult<User> {
        sqlx::query("INSERT INTO users (email, credential) VALUES (?, NULL)")
            .bind(email)
            .execute(pool)
            .await?;

        Ok(User::new(email))
    }

    /// Find a user by email
    pub async fn find_by_email(pool: &DatabasePool, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT email, credential FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Store or replace the long-lived credential for a user, creating the
    /// user record if it does not exist yet
    ///
    /// The identity provider hands out a fresh credential on every full
    /// authorization exchange, so this is an upsert.
    pub async fn set_credential(
        pool: &DatabasePool,
        email: &str,
        credential: &str,
    ) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO users (email, credential) VALUES (?, ?)
             ON CONFLICT(email) DO UPDATE SET credential = excluded.credential",
        )
        .bind(email)
        .bind(credential)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Look up the stored credential for a user
    ///
    /// Returns `Ok(None)` both when the user does not exist and when the user
    /// exists with no credential bound yet; callers that need to tell the two
    /// apart use `find_by_email`.
    pub async fn credential(pool: &DatabasePool, email: &str) -> StoreResult<Option<String>> {
        let user = Self::find_by_email(pool, email).await?;
        Ok(user.and_then(|u| u.credential))
    }

    /// Ensure a user record exists, returning whether it was created
    pub async fn ensure_exists(pool: &DatabasePool, email: &str) -> StoreResult<bool> {
        match Self::create(pool, email).await {
            Ok(_) => Ok(true),
            Err(StoreError::Conflict(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_db() -> sqlx::sqlite::SqlitePool {
        let pool = sqlx::sqlite::SqlitePool::connect("sqlite::memory:")
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE users (
                email TEXT PRIMARY KEY NOT NULL,
                credential TEXT
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        pool
    }

    #[tokio::test]
    async fn test_create_user() {
        let pool = setup_db().await;

        let user = UserRepository::create(&pool, "ok@example.com").await.unwrap();
        assert_eq!(user.email, "ok@example.com");
        assert!(user.credential.is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_is_conflict() {
        let pool = setup_db().await;

        UserRepository::create(&pool, "ok@example.com").await.unwrap();
        let err = UserRepository::create(&pool, "ok@example.com")
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let pool = setup_db().await;

        let user = UserRepository::find_by_email(&pool, "missing@example.com")
            .await
            .unwrap();

        assert!(user.is_none());
    }

    #[tokio::test]
    async fn test_set_credential_upserts() {
        let pool = setup_db().await;

        // No user yet: upsert creates one.
        UserRepository::set_credential(&pool, "ok@example.com", "1//refresh")
            .await
            .unwrap();
        assert_eq!(
            UserRepository::credential(&pool, "ok@example.com")
                .await
                .unwrap(),
            Some("1//refresh".to_string())
        );

        // Replacing an existing credential.
        UserRepository::set_credential(&pool, "ok@example.com", "1//rotated")
            .await
            .unwrap();
        assert_eq!(
            UserRepository::credential(&pool, "ok@example.com")
                .await
                .unwrap(),
            Some("1//rotated".to_string())
        );
    }

    #[tokio::test]
    async fn test_credential_absent_for_new_user() {
        let pool = setup_db().await;

        UserRepository::create(&pool, "new@example.com").await.unwrap();
        let credential = UserRepository::credential(&pool, "new@example.com")
            .await
            .unwrap();

        assert!(credential.is_none());
    }

    #[tokio::test]
    async fn test_ensure_exists() {
        let pool = setup_db().await;

        assert!(UserRepository::ensure_exists(&pool, "ok@example.com")
            .await
            .unwrap());
        assert!(!UserRepository::ensure_exists(&pool, "ok@example.com")
            .await
            .unwrap());
    }
}
