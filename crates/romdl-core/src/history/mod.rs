//! Download history domain types.
//!
//! History is an append-ordered log of download attempts. The "latest entry"
//! for a key is the last matching element when scanning from the end.
//!
//! # Structure
//!
//! - `status` - Canonical status taxonomy and raw synonym table
//! - `normalize` - Pure conversion from raw records to [`ProgressView`]
//! - `lenient` - Tolerant field deserializers for engine-written files

mod lenient;
pub mod normalize;
pub mod status;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use normalize::{ProgressView, compute_percent, normalize};
pub use status::{CanonicalStatus, RAW_STATUS_SYNONYMS};

/// Number of records returned by the "recent progress" query.
pub const RECENT_PROGRESS_LEN: usize = 10;

/// One entry per download attempt.
///
/// Fields the external transfer engine writes but this crate does not
/// interpret are kept in `extra` so read-modify-write never drops them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredRecord")]
pub struct HistoryRecord {
    pub platform: String,
    pub game_name: String,
    pub url: String,
    /// Raw status string; interpret only via [`CanonicalStatus::from_raw`].
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub downloaded_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub is_archive: bool,
    /// Generated task id of the attempt that wrote this record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// On-disk shape of a record.
///
/// Older engines write the title as `name`, some write both keys. The
/// title comes from `game_name` when it is non-empty, else from `name`;
/// `name` itself is kept in `extra` so it is written back unchanged.
#[derive(Deserialize)]
struct StoredRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    platform: String,
    #[serde(default, deserialize_with = "lenient::string")]
    game_name: String,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    status: String,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    progress: Option<f64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    downloaded_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient::u64_opt")]
    total_size: Option<u64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    speed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient::bool")]
    is_archive: bool,
    #[serde(default, deserialize_with = "lenient::string_opt")]
    task_id: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredRecord> for HistoryRecord {
    fn from(stored: StoredRecord) -> Self {
        let mut extra = stored.extra;
        let game_name = match stored.name {
            Some(name) => {
                let title = if stored.game_name.is_empty() {
                    name.clone()
                } else {
                    stored.game_name
                };
                extra.insert("name".to_string(), Value::String(name));
                title
            }
            None => stored.game_name,
        };
        Self {
            platform: stored.platform,
            game_name,
            url: stored.url,
            status: stored.status,
            progress: stored.progress,
            downloaded_size: stored.downloaded_size,
            total_size: stored.total_size,
            speed: stored.speed,
            timestamp: stored.timestamp,
            message: stored.message,
            is_archive: stored.is_archive,
            task_id: stored.task_id,
            extra,
        }
    }
}

impl HistoryRecord {
    /// Initial record for a freshly submitted download.
    pub fn started(
        platform: impl Into<String>,
        game_name: impl Into<String>,
        url: impl Into<String>,
        is_archive: bool,
        task_id: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            game_name: game_name.into(),
            url: url.into(),
            status: CanonicalStatus::Downloading.raw().to_string(),
            progress: Some(0.0),
            timestamp: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
            message: Some(String::new()),
            is_archive,
            task_id: Some(task_id.into()),
            ..Self::default()
        }
    }

    /// Canonical status of the raw status string.
    #[must_use]
    pub fn canonical_status(&self) -> CanonicalStatus {
        CanonicalStatus::from_raw(&self.status)
    }
}

/// Selects which records a lookup or update applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryKey {
    /// Records whose URL equals any of the candidates (raw and decoded forms).
    Urls(Vec<String>),
    /// Records written for a specific task.
    Task(String),
}

impl HistoryKey {
    /// Key matching a single URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Urls(vec![url.into()])
    }

    /// Key matching a task id.
    pub fn task(task_id: impl Into<String>) -> Self {
        Self::Task(task_id.into())
    }

    #[must_use]
    pub fn matches(&self, record: &HistoryRecord) -> bool {
        match self {
            Self::Urls(candidates) => candidates.iter().any(|u| *u == record.url),
            Self::Task(id) => record.task_id.as_deref() == Some(id.as_str()),
        }
    }
}

/// Index of the latest record matching `key`, scanning from the end.
#[must_use]
pub fn latest_index(records: &[HistoryRecord], key: &HistoryKey) -> Option<usize> {
    records.iter().rposition(|r| key.matches(r))
}

/// Latest record matching `key`.
#[must_use]
pub fn latest<'a>(records: &'a [HistoryRecord], key: &HistoryKey) -> Option<&'a HistoryRecord> {
    latest_index(records, key).map(|i| &records[i])
}

/// Partial in-place update of a history record.
///
/// Only fields that are `Some` are written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryPatch {
    pub status: Option<CanonicalStatus>,
    pub progress: Option<f64>,
    pub downloaded_size: Option<u64>,
    pub total_size: Option<u64>,
    pub speed: Option<f64>,
    pub message: Option<String>,
    /// Set `downloaded_size` to `total_size` when the total is known.
    pub fill_counters: bool,
    /// Leave records that already carry a terminal status untouched.
    pub only_if_active: bool,
}

impl HistoryPatch {
    /// Progress counters reported by a running transfer.
    #[must_use]
    pub fn progress(downloaded: u64, total: Option<u64>, speed: f64) -> Self {
        let progress = total
            .filter(|t| *t > 0)
            .map(|t| compute_percent(Some(downloaded), Some(t), None));
        Self {
            progress: progress.map(f64::from),
            downloaded_size: Some(downloaded),
            total_size: total,
            speed: Some(speed),
            ..Self::default()
        }
    }

    /// Terminal status with an explanatory message.
    pub fn terminal(status: CanonicalStatus, message: impl Into<String>) -> Self {
        let completed = status == CanonicalStatus::Completed;
        Self {
            status: Some(status),
            progress: completed.then_some(100.0),
            message: Some(message.into()),
            fill_counters: completed,
            ..Self::default()
        }
    }

    /// Repair applied when the artifact is found on disk without a
    /// terminal status.
    #[must_use]
    pub fn completed_by_presence() -> Self {
        Self {
            only_if_active: true,
            ..Self::terminal(CanonicalStatus::Completed, "Completed (by file presence)")
        }
    }

    /// Whether this patch may be written to `record`.
    #[must_use]
    pub fn applies_to(&self, record: &HistoryRecord) -> bool {
        !(self.only_if_active && record.canonical_status().is_terminal())
    }

    /// Apply this patch to `record` in place.
    pub fn apply(&self, record: &mut HistoryRecord) {
        if let Some(status) = self.status {
            record.status = status.raw().to_string();
        }
        if let Some(progress) = self.progress {
            record.progress = Some(progress);
        }
        if let Some(total) = self.total_size {
            record.total_size = Some(total);
        }
        if let Some(downloaded) = self.downloaded_size {
            record.downloaded_size = Some(downloaded);
        }
        if let Some(speed) = self.speed {
            record.speed = Some(speed);
        }
        if let Some(ref message) = self.message {
            record.message = Some(message.clone());
        }
        if self.fill_counters {
            if let Some(total) = record.total_size.filter(|t| *t > 0) {
                record.downloaded_size = Some(total);
            }
        }
    }
}
