//! Database models
//!
//! Core data models for persistent storage. All timestamp fields are stored
//! as ISO8601 strings (TEXT in SQLite) due to sqlx and SQLite type
//! limitations with chrono::DateTime<Utc>.

pub mod user;
pub mod workflow;

pub use user::User;
pub use workflow::{is_terminal_status, WorkflowRecord, STATUS_SUBMITTED};
