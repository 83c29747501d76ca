//! Raw history record to client-facing progress view.

use serde::Serialize;

use super::{CanonicalStatus, HistoryRecord};

/// Normalized progress payload returned by every progress surface.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressView {
    pub url: String,
    pub game_name: String,
    pub platform: String,
    pub status: CanonicalStatus,
    /// Integer percent in `[0, 100]`.
    pub percent: u8,
    pub speed: f64,
    pub downloaded_size: u64,
    pub total_size: u64,
    pub timestamp: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl ProgressView {
    /// View for a URL with no history entry.
    pub fn unknown(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            game_name: String::new(),
            platform: String::new(),
            status: CanonicalStatus::Unknown,
            percent: 0,
            speed: 0.0,
            downloaded_size: 0,
            total_size: 0,
            timestamp: String::new(),
            message: String::new(),
            task_id: None,
        }
    }
}

/// Derive the integer percent.
///
/// Byte counters win when the total is known; otherwise the recorded
/// `progress` value is used. The result is clamped to `[0, 100]`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn compute_percent(downloaded: Option<u64>, total: Option<u64>, progress: Option<f64>) -> u8 {
    if let Some(total) = total.filter(|t| *t > 0) {
        let downloaded = u128::from(downloaded.unwrap_or(0));
        let pct = (downloaded * 100 / u128::from(total)).min(100);
        return pct as u8;
    }
    progress
        .filter(|p| p.is_finite())
        .map_or(0, |p| p.clamp(0.0, 100.0).floor() as u8)
}

/// Normalize one raw record. Pure.
#[must_use]
pub fn normalize(record: &HistoryRecord) -> ProgressView {
    ProgressView {
        url: record.url.clone(),
        game_name: record.game_name.clone(),
        platform: record.platform.clone(),
        status: record.canonical_status(),
        percent: compute_percent(record.downloaded_size, record.total_size, record.progress),
        speed: record.speed.unwrap_or(0.0),
        downloaded_size: record.downloaded_size.unwrap_or(0),
        total_size: record.total_size.unwrap_or(0),
        timestamp: record.timestamp.clone().unwrap_or_default(),
        message: record.message.clone().unwrap_or_default(),
        task_id: record.task_id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: &str) -> HistoryRecord {
        HistoryRecord {
            url: "http://x/a.zip".to_string(),
            status: status.to_string(),
            ..HistoryRecord::default()
        }
    }

    #[test]
    fn percent_from_byte_counters() {
        let mut r = record("downloading");
        r.downloaded_size = Some(50);
        r.total_size = Some(200);
        r.progress = Some(99.0);
        assert_eq!(normalize(&r).percent, 25);
    }

    #[test]
    fn percent_falls_back_to_progress_when_total_is_zero() {
        let mut r = record("downloading");
        r.total_size = Some(0);
        r.progress = Some(73.0);
        assert_eq!(normalize(&r).percent, 73);
    }

    #[test]
    fn percent_is_clamped() {
        let mut r = record("downloading");
        r.downloaded_size = Some(500);
        r.total_size = Some(100);
        assert_eq!(normalize(&r).percent, 100);

        let mut over = record("downloading");
        over.progress = Some(250.0);
        assert_eq!(normalize(&over).percent, 100);

        let mut under = record("downloading");
        under.progress = Some(-3.0);
        assert_eq!(normalize(&under).percent, 0);
    }

    #[test]
    fn huge_counters_do_not_overflow() {
        assert_eq!(compute_percent(Some(u64::MAX), Some(u64::MAX), None), 100);
        assert_eq!(compute_percent(Some(u64::MAX / 2), Some(u64::MAX), None), 49);
    }

    #[test]
    fn missing_fields_default() {
        let view = normalize(&record("Download_OK"));
        assert_eq!(view.status, CanonicalStatus::Completed);
        assert_eq!(view.percent, 0);
        assert!(view.speed.abs() < f64::EPSILON);
        assert_eq!(view.message, "");
    }

    #[test]
    fn unknown_view_serializes_status_and_zero_percent() {
        let json = serde_json::to_value(ProgressView::unknown("http://x/none.zip")).unwrap();
        assert_eq!(json["status"], "unknown");
        assert_eq!(json["percent"], 0);
        assert_eq!(json["url"], "http://x/none.zip");
    }
}
