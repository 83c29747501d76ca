//! Axum web server adapter for romdl.
//!
//! Serves the JSON API under `/api`, the WebSocket Progress Streamer under
//! `/ws/progress` and, optionally, a static UI under `/web`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the integration tests under tests/
#[cfg(test)]
use http_body_util as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio_tungstenite as _;
#[cfg(test)]
use tower as _;

pub mod bootstrap;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod ws;

// Re-export primary types
pub use bootstrap::{AxumContext, CorsConfig, ServerConfig, bootstrap, start_server};
pub use error::HttpError;
pub use routes::create_router;
pub use state::AppState;
