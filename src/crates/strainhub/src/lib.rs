//! Workflow lifecycle service for strain-level metagenomic analyses
//!
//! Accepts computation requests over a REST API, submits them as WDL
//! workflows to an external execution engine, keeps a durable per-user
//! record of every submission, reconciles recorded statuses against the
//! engine, and retrieves and decodes result objects from cloud storage.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod engine;
pub mod results;
pub mod services;
pub mod storage;
