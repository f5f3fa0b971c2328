//! Repository pattern implementations for database access
//!
//! The store is the only party enforcing the uniqueness and existence
//! invariants of the user/workflow model; callers never do read-modify-write
//! on a user's workflow list.

pub mod user_repo;
pub mod workflow_repo;

pub use user_repo::UserRepository;
pub use workflow_repo::WorkflowRepository;
