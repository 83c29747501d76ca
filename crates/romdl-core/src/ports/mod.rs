//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No file format or HTTP client types in any signature
//! - Repository traits are minimal and whole-list oriented, mirroring the
//!   read-modify-write discipline of the History file
//! - Intent-based methods for the orchestrator (submit, cancel, redownload)

pub mod catalog;
pub mod credential;
pub mod download_orchestrator;
pub mod history_repository;

use thiserror::Error;

pub use catalog::{CatalogError, CatalogPort, find_platform};
pub use credential::CredentialStorePort;
pub use download_orchestrator::DownloadOrchestratorPort;
pub use history_repository::HistoryRepositoryPort;

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details and
/// provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage backend error (filesystem).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core domain.
/// Adapters should map this to their own error types (HTTP status codes,
/// CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing or invalid request fields.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown platform, URL or history entry.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing or invalid credential.
    #[error("Unauthorized: {0}")]
    Auth(String),

    /// Admission denied by the rate limiter.
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Catalog or transfer engine failure.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Storage I/O failure or unexpected condition.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepositoryError> for CoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(what) => Self::NotFound(what),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<CatalogError> for CoreError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::PlatformNotFound(id) => Self::NotFound(format!("platform {id}")),
            other => Self::Upstream(other.to_string()),
        }
    }
}
