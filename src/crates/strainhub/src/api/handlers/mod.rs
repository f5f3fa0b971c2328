//! API endpoint handlers

pub mod algorithms;
pub mod auth;
pub mod compute;
pub mod health;
pub mod results;
pub mod workflows;

pub use algorithms::{list_algorithms, list_species};
pub use auth::login;
pub use compute::submit_compute;
pub use health::health;
pub use results::get_result;
pub use workflows::{abort_workflow, list_workflows, workflow_outputs, workflow_status};
