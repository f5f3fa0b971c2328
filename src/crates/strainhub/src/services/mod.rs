//! Orchestration services
//!
//! Each service is one request/response round trip over injected
//! collaborators: the record store, the execution engine client, the object
//! store, and the decoder registry. No service holds long-lived mutable
//! state.

pub mod results;
pub mod status;
pub mod submit;

pub use results::{ResultError, ResultLocation, ResultRetriever};
pub use status::StatusSynchronizer;
pub use submit::{SubmitError, SubmittedWorkflow, WorkflowSubmitter};
