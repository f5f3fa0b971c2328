//! Database module
//!
//! Provides database connectivity, models, repositories, and error handling
//! for persistent storage of users and their workflow history.

pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;

pub use connection::{DatabaseConnection, DatabasePool};
pub use error::{StoreError, StoreResult};
