//! File-presence reconciliation.
//!
//! An external transfer engine can place the artifact on disk and then die
//! before writing its terminal status. On every progress query the latest
//! record for the URL is checked against the destination path; if the file
//! exists and the status is not terminal, the record is repaired in place.
//!
//! A stale file left by an unrelated earlier attempt at the same path is
//! also reported as completed. This is a known approximation.

use std::sync::Arc;

use tracing::{debug, info, warn};

use romdl_core::history::latest;
use romdl_core::{
    CanonicalStatus, CatalogPort, CoreError, HistoryKey, HistoryPatch, HistoryRepositoryPort, ProgressView,
    normalize,
};

use crate::destination::DestinationResolver;

/// The URL as given plus its percent-decoded form when that differs.
pub fn url_candidates(url: &str) -> Vec<String> {
    let mut candidates = vec![url.to_string()];
    if let Ok(decoded) = urlencoding::decode(url) {
        if decoded != url {
            candidates.push(decoded.into_owned());
        }
    }
    candidates
}

pub struct Reconciler {
    history: Arc<dyn HistoryRepositoryPort>,
    catalog: Arc<dyn CatalogPort>,
    destinations: DestinationResolver,
}

impl Reconciler {
    pub fn new(
        history: Arc<dyn HistoryRepositoryPort>,
        catalog: Arc<dyn CatalogPort>,
        destinations: DestinationResolver,
    ) -> Self {
        Self {
            history,
            catalog,
            destinations,
        }
    }

    /// Normalized latest record for `url`, repairing History first when the
    /// artifact is already on disk.
    ///
    /// Idempotent: once repaired the status is terminal and later calls
    /// return the same view without writing.
    pub async fn reconcile(&self, url: &str) -> Result<ProgressView, CoreError> {
        let records = self.history.load().await?;
        let key = HistoryKey::Urls(url_candidates(url));
        let Some(record) = latest(&records, &key) else {
            return Ok(ProgressView::unknown(url));
        };
        if record.canonical_status().is_terminal() {
            return Ok(normalize(record));
        }

        let platforms = match self.catalog.platforms().await {
            Ok(platforms) => platforms,
            Err(e) => {
                debug!(target: "romdl.history", error = %e, "catalog unavailable, using name-derived folder");
                Vec::new()
            }
        };
        let Some(path) = self
            .destinations
            .resolve(&platforms, &record.platform, &record.game_name)
        else {
            return Ok(normalize(record));
        };

        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            Ok(false) => return Ok(normalize(record)),
            Err(e) => {
                warn!(target: "romdl.history", path = %path.display(), error = %e, "existence check failed");
                return Ok(normalize(record));
            }
        }

        // The store re-checks the terminal guard on its own fresh read, so a
        // status written by the transfer since `load` wins.
        let Some(current) = self
            .history
            .update_latest(&key, &HistoryPatch::completed_by_presence())
            .await?
        else {
            return Ok(normalize(record));
        };
        if current.canonical_status() == CanonicalStatus::Completed {
            info!(
                target: "romdl.history",
                url = %current.url,
                path = %path.display(),
                "marked completed by file presence"
            );
        }
        Ok(normalize(&current))
    }
}
