//! Account-gated single-file host.
//!
//! Some hosts only serve direct downloads to account holders. The stored API
//! key is sent as a bearer credential and the transfer itself is delegated to
//! the direct strategy.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use romdl_core::{CredentialStorePort, TransferError, TransferResult};

use super::{DirectHttpStrategy, ProgressSink, TransferJob, TransferStrategy, url_host};

pub struct GatedHostStrategy {
    hosts: Vec<String>,
    credentials: Arc<dyn CredentialStorePort>,
    direct: DirectHttpStrategy,
}

impl GatedHostStrategy {
    pub fn new(
        hosts: Vec<String>,
        credentials: Arc<dyn CredentialStorePort>,
        direct: DirectHttpStrategy,
    ) -> Self {
        let hosts = hosts.into_iter().map(|h| h.to_lowercase()).collect();
        Self {
            hosts,
            credentials,
            direct,
        }
    }
}

#[async_trait]
impl TransferStrategy for GatedHostStrategy {
    fn name(&self) -> &'static str {
        "gated"
    }

    fn matches(&self, url: &str) -> bool {
        let Some(host) = url_host(url) else {
            return false;
        };
        self.hosts
            .iter()
            .any(|h| host == *h || host.ends_with(&format!(".{h}")))
    }

    async fn run(&self, job: TransferJob, sink: Arc<dyn ProgressSink>) -> TransferResult<()> {
        let key = self
            .credentials
            .load()
            .await
            .map_err(|e| TransferError::other(e.to_string()))?
            .ok_or_else(|| {
                warn!(target: "romdl.download", task_id = %job.task_id, "gated host key missing");
                TransferError::MissingCredential("gated host API key is not configured".into())
            })?;
        self.direct.fetch(&job, Some(&key), sink.as_ref()).await
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use romdl_core::{RepositoryError, TaskId};
    use tokio_util::sync::CancellationToken;

    use super::*;

    struct NoKey;

    #[async_trait]
    impl CredentialStorePort for NoKey {
        async fn load(&self) -> Result<Option<String>, RepositoryError> {
            Ok(None)
        }
        async fn store(&self, _key: &str) -> Result<(), RepositoryError> {
            Ok(())
        }
    }

    struct Silent;

    #[async_trait]
    impl ProgressSink for Silent {
        async fn report(&self, _downloaded: u64, _total: Option<u64>, _speed: f64) {}
    }

    fn strategy() -> GatedHostStrategy {
        GatedHostStrategy::new(
            vec!["1Fichier.com".into()],
            Arc::new(NoKey),
            DirectHttpStrategy::with_default_client().unwrap(),
        )
    }

    #[test]
    fn matches_configured_hosts_and_subdomains() {
        let s = strategy();
        assert!(s.matches("https://1fichier.com/?abc"));
        assert!(s.matches("https://a.1fichier.com/?abc"));
        assert!(!s.matches("https://not1fichier.com/?abc"));
        assert!(!s.matches("http://example.org/a.zip"));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let job = TransferJob {
            task_id: TaskId::generate(),
            url: "https://1fichier.com/?abc".into(),
            destination: PathBuf::from("/nonexistent/a.zip"),
            is_archive: false,
            cancel: CancellationToken::new(),
        };
        let err = strategy().run(job, Arc::new(Silent)).await.unwrap_err();
        assert!(matches!(err, TransferError::MissingCredential(_)));
    }
}
