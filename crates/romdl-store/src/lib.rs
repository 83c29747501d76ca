//! File-backed adapters for the romdl core ports.
//!
//! - [`JsonHistoryStore`] keeps the History as a single JSON array and
//!   replaces it atomically on every write.
//! - [`JsonCatalog`] reads the platform list and per-platform game lists,
//!   loading the platform list lazily on first use.
//! - [`FileCredentialStore`] holds the gated-host API key in a plain file.

#![deny(unused_crate_dependencies)]

mod atomic;
pub mod catalog;
pub mod credential;
pub mod history;

pub use catalog::JsonCatalog;
pub use credential::FileCredentialStore;
pub use history::JsonHistoryStore;
