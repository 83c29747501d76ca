//! Core domain types for downloads.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::history::HistoryRecord;
use crate::ports::CoreError;

/// Generated identifier of one download task.
///
/// The primary key of a download; the URL is only a secondary index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Fresh random (v4) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TaskId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.trim().to_string())
    }
}

/// Download request as submitted by a client.
///
/// Fields default to empty so a malformed batch item can still be parsed
/// and reported individually by [`DownloadRequest::validate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub game_name: String,
    /// Older clients send the title as `name`; used when `game_name` is blank.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_archive: Option<bool>,
}

impl DownloadRequest {
    pub fn new(
        platform: impl Into<String>,
        game_name: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            game_name: game_name.into(),
            name: None,
            url: url.into(),
            is_archive: None,
        }
    }

    #[must_use]
    pub const fn with_archive(mut self, is_archive: bool) -> Self {
        self.is_archive = Some(is_archive);
        self
    }

    /// Check required fields and trim them.
    pub fn validate(self) -> Result<ValidatedRequest, CoreError> {
        let platform = required("platform", &self.platform)?;
        let title = if self.game_name.trim().is_empty() {
            self.name.as_deref().unwrap_or_default()
        } else {
            &self.game_name
        };
        let game_name = required("game_name", title)?;
        let url = required("url", &self.url)?;
        Ok(ValidatedRequest {
            platform,
            game_name,
            url,
            is_archive: self.is_archive.unwrap_or(false),
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// A request whose required fields are known to be present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub platform: String,
    pub game_name: String,
    pub url: String,
    pub is_archive: bool,
}

/// Result of a successful submission.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmitOutcome {
    pub task_id: TaskId,
    pub history: HistoryRecord,
}

/// Per-item outcome of a batch submission.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchItemResult {
    Submitted(SubmitOutcome),
    Failed { error: String },
}

impl BatchItemResult {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }
}

impl From<Result<SubmitOutcome, CoreError>> for BatchItemResult {
    fn from(result: Result<SubmitOutcome, CoreError>) -> Self {
        match result {
            Ok(outcome) => Self::Submitted(outcome),
            Err(e) => Self::Failed {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn missing_url_fails_validation() {
        let req: DownloadRequest =
            serde_json::from_value(serde_json::json!({"platform": "nes", "game_name": "A"}))
                .unwrap();
        let err = req.validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation(ref m) if m.contains("url")));
    }

    #[test]
    fn validation_trims_and_defaults_archive_flag() {
        let valid = DownloadRequest::new(" nes ", "A", " http://x/a.zip ")
            .validate()
            .unwrap();
        assert_eq!(valid.platform, "nes");
        assert_eq!(valid.url, "http://x/a.zip");
        assert!(!valid.is_archive);
    }

    #[test]
    fn legacy_name_key_is_accepted_alongside_game_name() {
        let both: DownloadRequest = serde_json::from_value(serde_json::json!({
            "platform": "nes", "game_name": "A", "name": "Old A", "url": "http://x/a"
        }))
        .unwrap();
        assert_eq!(both.validate().unwrap().game_name, "A");

        let legacy: DownloadRequest = serde_json::from_value(serde_json::json!({
            "platform": "nes", "name": "B", "url": "http://x/b"
        }))
        .unwrap();
        assert_eq!(legacy.validate().unwrap().game_name, "B");
    }

    #[test]
    fn failed_batch_item_serializes_error() {
        let item = BatchItemResult::from(Err(CoreError::Validation("url is required".into())));
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["error"], "Validation error: url is required");
    }
}
