//! Task lifecycle and cancellation types.
//!
//! Cancellation is cooperative: a request is recorded immediately and the
//! transfer observes it at its next yield point. "Request sent" and
//! "operation terminated" are therefore distinct observable states.

use serde::{Deserialize, Serialize};

use super::TaskId;

/// How a finished task ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Completed,
    Failed,
    Canceled,
}

/// Observable lifecycle state of a task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum TaskState {
    Running,
    CancelRequested,
    Finished { outcome: TaskOutcome },
    /// No live task matched the request.
    NotRunning,
}

impl TaskState {
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Self::Running | Self::CancelRequested)
    }
}

/// Point-in-time view of a task.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TaskSnapshot {
    pub task_id: TaskId,
    pub url: String,
    pub strategy: &'static str,
    #[serde(flatten)]
    pub state: TaskState,
}

/// What a cancel request targets. At least one identifier is required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancelTarget {
    Task(TaskId),
    Url(String),
}

impl CancelTarget {
    /// Build from optional client fields; the task id wins when both are set.
    #[must_use]
    pub fn from_parts(task_id: Option<&str>, url: Option<&str>) -> Option<Self> {
        let task_id = task_id.map(str::trim).filter(|s| !s.is_empty());
        let url = url.map(str::trim).filter(|s| !s.is_empty());
        match (task_id, url) {
            (Some(id), _) => Some(Self::Task(TaskId::from(id))),
            (None, Some(url)) => Some(Self::Url(url.to_string())),
            (None, None) => None,
        }
    }
}

/// Reply to a cancel request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CancelAck {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    #[serde(flatten)]
    pub state: TaskState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_target_requires_an_identifier() {
        assert_eq!(CancelTarget::from_parts(None, Some("  ")), None);
        assert_eq!(
            CancelTarget::from_parts(Some("t"), Some("http://x")),
            Some(CancelTarget::Task(TaskId::from("t")))
        );
        assert_eq!(
            CancelTarget::from_parts(None, Some("http://x")),
            Some(CancelTarget::Url("http://x".into()))
        );
    }

    #[test]
    fn states_serialize_with_tag() {
        let json = serde_json::to_value(TaskState::Finished {
            outcome: TaskOutcome::Canceled,
        })
        .unwrap();
        assert_eq!(json["state"], "finished");
        assert_eq!(json["outcome"], "canceled");

        let ack = CancelAck {
            ok: true,
            task_id: None,
            state: TaskState::NotRunning,
        };
        let json = serde_json::to_value(&ack).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["state"], "not_running");
    }
}
