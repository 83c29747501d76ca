//! History repository port.

use async_trait::async_trait;

use super::RepositoryError;
use crate::history::{HistoryKey, HistoryPatch, HistoryRecord};

/// Durable, append-ordered History store.
///
/// Every mutating method is a full read-modify-write of the durable copy,
/// so concurrent writers (including an external transfer engine) are
/// observed as whole-record changes.
#[async_trait]
pub trait HistoryRepositoryPort: Send + Sync {
    /// Full ordered record list. A missing store yields an empty list.
    async fn load(&self) -> Result<Vec<HistoryRecord>, RepositoryError>;

    /// Overwrite the durable copy with `records`.
    async fn save(&self, records: &[HistoryRecord]) -> Result<(), RepositoryError>;

    /// Append one record and return it as stored.
    async fn append(&self, record: HistoryRecord) -> Result<HistoryRecord, RepositoryError>;

    /// Patch the latest record matching `key` and return it as stored.
    ///
    /// Returns `Ok(None)` without writing when nothing matches. When the
    /// patch does not apply to the current record (see
    /// [`HistoryPatch::applies_to`]) the record is returned unchanged and
    /// nothing is written. The check runs on the copy read inside the update.
    async fn update_latest(
        &self,
        key: &HistoryKey,
        patch: &HistoryPatch,
    ) -> Result<Option<HistoryRecord>, RepositoryError>;
}
