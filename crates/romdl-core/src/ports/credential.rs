//! Storage port for the account-gated host credential.

use async_trait::async_trait;

use super::RepositoryError;

/// Persists the API key used by the gated-host transfer strategy.
///
/// Implementations never log or return the key through any other path.
#[async_trait]
pub trait CredentialStorePort: Send + Sync {
    /// Stored key, or `None` when absent or blank.
    async fn load(&self) -> Result<Option<String>, RepositoryError>;

    /// Replace the stored key. A blank key clears it.
    async fn store(&self, key: &str) -> Result<(), RepositoryError>;
}
