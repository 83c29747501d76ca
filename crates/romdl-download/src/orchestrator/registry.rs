//! In-memory task registry.
//!
//! Tasks are keyed by generated id; the URL is a secondary index pointing at
//! the most recent task for that URL. Finished tasks are retained up to a
//! cap so callers can observe how a cancelled task ended.

use std::collections::HashMap;

use indexmap::IndexMap;
use tokio_util::sync::CancellationToken;

use romdl_core::{TaskId, TaskOutcome, TaskSnapshot, TaskState};

/// Number of finished tasks kept for inspection.
pub const FINISHED_RETENTION: usize = 256;

struct TaskEntry {
    url: String,
    strategy: &'static str,
    cancel: CancellationToken,
    state: TaskState,
}

pub struct TaskRegistry {
    tasks: IndexMap<TaskId, TaskEntry>,
    by_url: HashMap<String, TaskId>,
    retention: usize,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::with_retention(FINISHED_RETENTION)
    }

    pub fn with_retention(retention: usize) -> Self {
        Self {
            tasks: IndexMap::new(),
            by_url: HashMap::new(),
            retention,
        }
    }

    pub fn register(
        &mut self,
        id: TaskId,
        url: &str,
        strategy: &'static str,
        cancel: CancellationToken,
    ) {
        self.by_url.insert(url.to_string(), id.clone());
        self.tasks.insert(
            id,
            TaskEntry {
                url: url.to_string(),
                strategy,
                cancel,
                state: TaskState::Running,
            },
        );
    }

    /// Latest task registered for any of `urls`.
    pub fn task_for_urls(&self, urls: &[String]) -> Option<TaskId> {
        urls.iter()
            .filter_map(|u| self.by_url.get(u))
            .max_by_key(|id| self.tasks.get_index_of(*id))
            .cloned()
    }

    /// Signal cancellation and return the resulting state.
    ///
    /// Live tasks move to `CancelRequested`; finished tasks keep their
    /// outcome; unknown ids report `NotRunning`.
    pub fn request_cancel(&mut self, id: &TaskId) -> TaskState {
        let Some(entry) = self.tasks.get_mut(id) else {
            return TaskState::NotRunning;
        };
        if entry.state.is_live() {
            entry.cancel.cancel();
            entry.state = TaskState::CancelRequested;
        }
        entry.state
    }

    pub fn finish(&mut self, id: &TaskId, outcome: TaskOutcome) {
        if let Some(entry) = self.tasks.get_mut(id) {
            entry.state = TaskState::Finished { outcome };
        }
        self.prune();
    }

    pub fn snapshot(&self, id: &TaskId) -> Option<TaskSnapshot> {
        self.tasks.get(id).map(|entry| TaskSnapshot {
            task_id: id.clone(),
            url: entry.url.clone(),
            strategy: entry.strategy,
            state: entry.state,
        })
    }

    pub fn live_count(&self) -> usize {
        self.tasks.values().filter(|e| e.state.is_live()).count()
    }

    fn prune(&mut self) {
        let finished = self.tasks.values().filter(|e| !e.state.is_live()).count();
        let mut excess = finished.saturating_sub(self.retention);
        if excess == 0 {
            return;
        }
        let mut removed = Vec::new();
        self.tasks.retain(|id, entry| {
            if excess > 0 && !entry.state.is_live() {
                excess -= 1;
                removed.push((id.clone(), entry.url.clone()));
                false
            } else {
                true
            }
        });
        for (id, url) in removed {
            if self.by_url.get(&url) == Some(&id) {
                self.by_url.remove(&url);
            }
        }
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
