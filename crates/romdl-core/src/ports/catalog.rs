//! Catalog port for platform and game listings.
//!
//! The catalog source format is owned by the adapter; this port only
//! exposes normalized domain types.

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{CatalogGame, PlatformDescriptor};

/// Errors that can occur during catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The platform list has not been provisioned.
    #[error("Catalog not loaded: {0}")]
    NotLoaded(String),

    /// No game list exists for the platform.
    #[error("Platform not found: {0}")]
    PlatformNotFound(String),

    /// Reading a catalog file failed.
    #[error("Catalog I/O error: {0}")]
    Io(String),

    /// A catalog file could not be decoded.
    #[error("Catalog parse error: {0}")]
    Parse(String),
}

/// Read access to the platform catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogPort: Send + Sync {
    /// All platform descriptors, loading lazily on first use.
    async fn platforms(&self) -> Result<Vec<PlatformDescriptor>, CatalogError>;

    /// Normalized game list for one platform.
    ///
    /// Returns [`CatalogError::PlatformNotFound`] when the platform has no
    /// game list.
    async fn games(&self, platform_id: &str) -> Result<Vec<CatalogGame>, CatalogError>;
}

/// Descriptor whose identifier equals `platform`.
#[must_use]
pub fn find_platform<'a>(
    platforms: &'a [PlatformDescriptor],
    platform: &str,
) -> Option<&'a PlatformDescriptor> {
    platforms.iter().find(|p| p.platform == platform)
}
