//! Plain-file implementation of the `CredentialStorePort` trait.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use romdl_core::{CredentialStorePort, RepositoryError};

use crate::atomic::write_atomic;

/// Gated-host API key stored as the sole content of a text file.
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CredentialStorePort for FileCredentialStore {
    async fn load(&self) -> Result<Option<String>, RepositoryError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let key = content.trim();
                Ok((!key.is_empty()).then(|| key.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(RepositoryError::Storage(e.to_string())),
        }
    }

    async fn store(&self, key: &str) -> Result<(), RepositoryError> {
        let key = key.trim();
        write_atomic(&self.path, key.as_bytes().to_vec())
            .await
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;
        info!(target: "romdl.download", present = !key.is_empty(), "gated host key updated");
        Ok(())
    }
}
