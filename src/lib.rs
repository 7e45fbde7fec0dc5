//! altenv: environment variable layering and resolution (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod env;
pub mod models;
pub mod orchestrator;
pub mod output;
pub mod sources;
