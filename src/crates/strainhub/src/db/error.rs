//! Store error types and handling
//!
//! Provides custom error types for persistence operations with proper error
//! propagation and conversion from sqlx errors.

use thiserror::Error;

/// Custom store error type
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record not found (no such user or workflow)
    #[error("Record not found: {0}")]
    NotFound(String),

    /// Uniqueness conflict (duplicate user email or workflow id)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence layer unreachable or misconfigured
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Query execution error
    #[error("Query error: {0}")]
    Query(String),

    /// Row mapping or data type error
    #[error("Row mapping error: {0}")]
    Mapping(String),
}

impl StoreError {
    /// Create a new NotFound error with context
    pub fn not_found(context: impl Into<String>) -> Self {
        StoreError::NotFound(context.into())
    }

    /// Create a new Conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        StoreError::Conflict(msg.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// Check if this is a uniqueness conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict(_))
    }
}

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Convert sqlx::Error to StoreError
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => {
                StoreError::NotFound("No matching row found".to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::Conflict(db_err.to_string())
            }
            sqlx::Error::ColumnNotFound(col) => {
                StoreError::Mapping(format!("Column not found: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                StoreError::Mapping(format!("Error decoding column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => {
                StoreError::Mapping(format!("Decode error: {}", source))
            }
            sqlx::Error::Configuration(msg) => {
                StoreError::Unavailable(format!("Configuration error: {}", msg))
            }
            sqlx::Error::Io(err) => StoreError::Unavailable(format!("IO error: {}", err)),
            sqlx::Error::PoolTimedOut => {
                StoreError::Unavailable("Connection pool timed out".to_string())
            }
            sqlx::Error::PoolClosed => {
                StoreError::Unavailable("Connection pool is closed".to_string())
            }
            err => StoreError::Query(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = StoreError::not_found("email=missing@example.com");
        assert!(err.is_not_found());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_conflict_error() {
        let err = StoreError::conflict("UNIQUE constraint failed");
        assert!(err.is_conflict());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::not_found("user");
        let msg = format!("{}", err);
        assert!(msg.contains("not found"));
    }

    #[test]
    fn test_sqlx_row_not_found_conversion() {
        let sqlx_err = sqlx::Error::RowNotFound;
        let store_err: StoreError = sqlx_err.into();
        assert!(store_err.is_not_found());
    }

    #[test]
    fn test_pool_closed_is_unavailable() {
        let store_err: StoreError = sqlx::Error::PoolClosed.into();
        assert!(matches!(store_err, StoreError::Unavailable(_)));
    }
}
