//! Read-side queries over History.

use std::collections::HashSet;
use std::sync::Arc;

use romdl_core::{
    CanonicalStatus, CoreError, HistoryRecord, HistoryRepositoryPort, ProgressView,
    RECENT_PROGRESS_LEN, normalize,
};

use crate::reconcile::Reconciler;

pub struct HistoryQueries {
    history: Arc<dyn HistoryRepositoryPort>,
    reconciler: Arc<Reconciler>,
}

impl HistoryQueries {
    pub fn new(history: Arc<dyn HistoryRepositoryPort>, reconciler: Arc<Reconciler>) -> Self {
        Self {
            history,
            reconciler,
        }
    }

    /// Reconciled progress for one URL.
    pub async fn progress(&self, url: &str) -> Result<ProgressView, CoreError> {
        self.reconciler.reconcile(url).await
    }

    /// Last [`RECENT_PROGRESS_LEN`] records, most recent last.
    pub async fn recent(&self) -> Result<Vec<ProgressView>, CoreError> {
        let records = self.history.load().await?;
        let start = records.len().saturating_sub(RECENT_PROGRESS_LEN);
        Ok(records[start..].iter().map(normalize).collect())
    }

    /// Raw records, optionally filtered by canonical status.
    ///
    /// `limit > 0` keeps the last `limit` matches.
    pub async fn history(
        &self,
        filter: Option<CanonicalStatus>,
        limit: usize,
    ) -> Result<Vec<HistoryRecord>, CoreError> {
        let mut records = self.history.load().await?;
        if let Some(status) = filter {
            records.retain(|r| r.canonical_status() == status);
        }
        if limit > 0 && records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }

    /// URLs with at least one completed History entry.
    pub async fn completed_urls(&self) -> Result<HashSet<String>, CoreError> {
        let records = self.history.load().await?;
        Ok(records
            .into_iter()
            .filter(|r| r.canonical_status() == CanonicalStatus::Completed)
            .map(|r| r.url)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use romdl_store::{JsonCatalog, JsonHistoryStore};

    use super::*;
    use crate::destination::DestinationResolver;

    fn record(url: &str, status: &str) -> HistoryRecord {
        HistoryRecord {
            platform: "nes".into(),
            game_name: url.rsplit('/').next().unwrap_or_default().into(),
            url: url.into(),
            status: status.into(),
            ..HistoryRecord::default()
        }
    }

    async fn queries(records: Vec<HistoryRecord>) -> (tempfile::TempDir, HistoryQueries) {
        let dir = tempfile::tempdir().unwrap();
        let history = Arc::new(JsonHistoryStore::new(dir.path().join("history.json")));
        history.save(&records).await.unwrap();
        let reconciler = Arc::new(Reconciler::new(
            history.clone(),
            Arc::new(JsonCatalog::new(
                dir.path().join("systems.json"),
                dir.path().join("games"),
            )),
            DestinationResolver::new(dir.path().join("roms")),
        ));
        (dir, HistoryQueries::new(history, reconciler))
    }

    #[tokio::test]
    async fn completed_filter_matches_every_raw_variant() {
        let (_dir, q) = queries(vec![
            record("http://x/1", "Download_OK"),
            record("http://x/2", "Erreur"),
            record("http://x/3", "completed"),
            record("http://x/4", "Terminé"),
            record("http://x/5", "downloading"),
            record("http://x/6", "DONE"),
        ])
        .await;
        let urls: Vec<_> = q
            .history(Some(CanonicalStatus::Completed), 0)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, ["http://x/1", "http://x/3", "http://x/4", "http://x/6"]);
    }

    #[tokio::test]
    async fn limit_keeps_most_recent() {
        let records = (0..5).map(|i| record(&format!("http://x/{i}"), "Erreur")).collect();
        let (_dir, q) = queries(records).await;
        let urls: Vec<_> = q
            .history(None, 2)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.url)
            .collect();
        assert_eq!(urls, ["http://x/3", "http://x/4"]);
    }

    #[tokio::test]
    async fn recent_returns_last_ten_most_recent_last() {
        let records = (0..15)
            .map(|i| record(&format!("http://x/{i}"), "downloading"))
            .collect();
        let (_dir, q) = queries(records).await;
        let recent = q.recent().await.unwrap();
        assert_eq!(recent.len(), RECENT_PROGRESS_LEN);
        assert_eq!(recent[0].url, "http://x/5");
        assert_eq!(recent[9].url, "http://x/14");
    }

    #[tokio::test]
    async fn completed_urls_ignores_other_statuses() {
        let (_dir, q) = queries(vec![
            record("http://x/a", "Download_OK"),
            record("http://x/b", "Canceled"),
        ])
        .await;
        let urls = q.completed_urls().await.unwrap();
        assert!(urls.contains("http://x/a"));
        assert!(!urls.contains("http://x/b"));
    }

    #[tokio::test]
    async fn progress_of_unknown_url_is_unknown() {
        let (_dir, q) = queries(Vec::new()).await;
        let view = q.progress("http://x/none").await.unwrap();
        assert_eq!(view.status, CanonicalStatus::Unknown);
    }
}
