//! JSON file implementation of the `HistoryRepositoryPort` trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use romdl_core::history::latest_index;
use romdl_core::{HistoryKey, HistoryPatch, HistoryRecord, HistoryRepositoryPort, RepositoryError};

use crate::atomic::write_atomic;

/// History stored as one JSON array in a single file.
///
/// The file is shared with an external transfer engine, so every mutation
/// re-reads it first. Writers inside this process are serialized by a
/// mutex; readers rely on atomic replacement and never block.
pub struct JsonHistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<HistoryRecord>, RepositoryError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(RepositoryError::Storage(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(target: "romdl.history", path = %self.path.display(), error = %e, "history file is not a valid record list");
            RepositoryError::Serialization(e.to_string())
        })
    }

    async fn write_records(&self, records: &[HistoryRecord]) -> Result<(), RepositoryError> {
        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        write_atomic(&self.path, json)
            .await
            .map_err(|e| RepositoryError::Storage(format!("{}: {e}", self.path.display())))?;
        debug!(target: "romdl.history", records = records.len(), "history saved");
        Ok(())
    }
}

#[async_trait]
impl HistoryRepositoryPort for JsonHistoryStore {
    async fn load(&self) -> Result<Vec<HistoryRecord>, RepositoryError> {
        self.read_records().await
    }

    async fn save(&self, records: &[HistoryRecord]) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        self.write_records(records).await
    }

    async fn append(&self, record: HistoryRecord) -> Result<HistoryRecord, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        records.push(record.clone());
        self.write_records(&records).await?;
        debug!(target: "romdl.history", url = %record.url, "history entry appended");
        Ok(record)
    }

    async fn update_latest(
        &self,
        key: &HistoryKey,
        patch: &HistoryPatch,
    ) -> Result<Option<HistoryRecord>, RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.read_records().await?;
        let Some(index) = latest_index(&records, key) else {
            return Ok(None);
        };
        if !patch.applies_to(&records[index]) {
            debug!(target: "romdl.history", url = %records[index].url, "patch skipped, record already terminal");
            return Ok(Some(records.swap_remove(index)));
        }
        patch.apply(&mut records[index]);
        let updated = records[index].clone();
        self.write_records(&records).await?;
        Ok(Some(updated))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use romdl_core::CanonicalStatus;

    use super::*;

    fn store() -> (tempfile::TempDir, JsonHistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonHistoryStore::new(dir.path().join("history.json"));
        (dir, store)
    }

    #[tokio::test]
    async fn missing_or_blank_file_is_empty() {
        let (_dir, store) = store();
        assert!(store.load().await.unwrap().is_empty());
        std::fs::write(store.path(), "  \n").unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn append_preserves_order() {
        let (_dir, store) = store();
        for name in ["a", "b", "c"] {
            store
                .append(HistoryRecord::started("nes", name, format!("http://x/{name}"), false, name))
                .await
                .unwrap();
        }
        let names: Vec<_> = store
            .load()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.game_name)
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn update_latest_mutates_last_match_only() {
        let (_dir, store) = store();
        store
            .append(HistoryRecord::started("nes", "A", "http://x/a", false, "t1"))
            .await
            .unwrap();
        store
            .append(HistoryRecord::started("nes", "A", "http://x/a", false, "t2"))
            .await
            .unwrap();

        let updated = store
            .update_latest(
                &HistoryKey::url("http://x/a"),
                &HistoryPatch::terminal(CanonicalStatus::Error, "boom"),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.task_id.as_deref(), Some("t2"));

        let records = store.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].canonical_status(), CanonicalStatus::Downloading);
        assert_eq!(records[1].status, "Erreur");
    }

    #[tokio::test]
    async fn update_without_match_writes_nothing() {
        let (_dir, store) = store();
        let result = store
            .update_latest(&HistoryKey::url("http://x/none"), &HistoryPatch::default())
            .await
            .unwrap();
        assert!(result.is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn unknown_engine_fields_survive_mutation() {
        let (_dir, store) = store();
        std::fs::write(
            store.path(),
            r#"[{"platform":"nes","name":"A","url":"http://x/a","status":"Téléchargement","engine_slot":3}]"#,
        )
        .unwrap();
        store
            .update_latest(
                &HistoryKey::url("http://x/a"),
                &HistoryPatch::completed_by_presence(),
            )
            .await
            .unwrap();
        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw[0]["engine_slot"], 3);
        assert_eq!(raw[0]["status"], "Download_OK");
    }

    #[tokio::test]
    async fn presence_repair_leaves_terminal_record_alone() {
        let (_dir, store) = store();
        store
            .append(HistoryRecord::started("nes", "A", "http://x/a", false, "t1"))
            .await
            .unwrap();
        store
            .update_latest(
                &HistoryKey::task("t1"),
                &HistoryPatch::terminal(CanonicalStatus::Canceled, "Download cancelled"),
            )
            .await
            .unwrap();

        let current = store
            .update_latest(&HistoryKey::url("http://x/a"), &HistoryPatch::completed_by_presence())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.status, "Canceled");
        assert_eq!(store.load().await.unwrap()[0].status, "Canceled");
    }

    #[tokio::test]
    async fn corrupt_file_is_a_serialization_error() {
        let (_dir, store) = store();
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(
            store.load().await,
            Err(RepositoryError::Serialization(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_are_not_lost() {
        let (_dir, store) = store();
        let store = Arc::new(store);
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append(HistoryRecord::started("nes", "G", format!("http://x/{i}"), false, i.to_string()))
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(store.load().await.unwrap().len(), 16);
    }
}
