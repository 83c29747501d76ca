//! HTTP request handlers for the Axum web server.
//!
//! Each submodule contains handlers for a specific API area.
//! Handlers are thin wrappers over the orchestrator, query service and
//! catalog held in `AxumContext`.

pub mod catalog;
pub mod downloads;
pub mod history;
pub mod progress;
pub mod search;
pub mod settings;
pub mod status;
pub mod tasks;
