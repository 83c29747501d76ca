//! History-backed progress sink.

use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tracing::warn;

use romdl_core::{HistoryKey, HistoryPatch, HistoryRepositoryPort, TaskId};

use super::ProgressThrottle;
use crate::strategy::ProgressSink;

/// Writes throttled progress patches to the History entry of one task.
pub struct HistoryProgressSink {
    history: Arc<dyn HistoryRepositoryPort>,
    key: HistoryKey,
    throttle: Mutex<ProgressThrottle>,
}

impl HistoryProgressSink {
    pub fn new(history: Arc<dyn HistoryRepositoryPort>, task_id: &TaskId) -> Self {
        Self::with_throttle(history, task_id, ProgressThrottle::default())
    }

    pub fn with_throttle(
        history: Arc<dyn HistoryRepositoryPort>,
        task_id: &TaskId,
        throttle: ProgressThrottle,
    ) -> Self {
        Self {
            history,
            key: HistoryKey::task(task_id.as_str()),
            throttle: Mutex::new(throttle),
        }
    }
}

#[async_trait]
impl ProgressSink for HistoryProgressSink {
    async fn report(&self, downloaded: u64, total: Option<u64>, speed: f64) {
        let finished = total.is_some_and(|t| t > 0 && downloaded >= t);
        let emit = {
            let mut throttle = self.throttle.lock().unwrap_or_else(PoisonError::into_inner);
            throttle.should_emit() || finished
        };
        if !emit {
            return;
        }
        let patch = HistoryPatch::progress(downloaded, total, speed);
        if let Err(e) = self.history.update_latest(&self.key, &patch).await {
            warn!(target: "romdl.download", error = %e, "failed to record progress");
        }
    }
}
