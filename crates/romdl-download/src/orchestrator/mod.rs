//! Task orchestrator implementation.
//!
//! This module provides the concrete implementation of
//! `DownloadOrchestratorPort`.
//!
//! # Lifecycle
//!
//! 1. `submit` validates the request, makes sure the catalog is loaded and
//!    appends a `downloading` History entry carrying the new task id.
//! 2. The task is registered (cancellation token, URL index) before the
//!    transfer is spawned, so a cancel can never miss it.
//! 3. The spawned transfer reports progress through a History sink; when it
//!    returns, the orchestrator writes the terminal status and marks the
//!    task finished.

mod registry;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use romdl_core::history::latest;
use romdl_core::{
    BatchItemResult, CancelAck, CancelTarget, CanonicalStatus, CatalogPort, CoreError,
    DownloadOrchestratorPort, DownloadRequest, HistoryKey, HistoryPatch, HistoryRecord,
    HistoryRepositoryPort, SubmitOutcome, TaskId, TaskOutcome, TaskSnapshot, TransferError,
};

use crate::destination::DestinationResolver;
use crate::progress::HistoryProgressSink;
use crate::reconcile::url_candidates;
use crate::strategy::{ProgressSink, TransferJob, TransferStrategy, select_strategy};

use registry::TaskRegistry;

/// Dependencies for the orchestrator.
#[derive(Clone)]
pub struct OrchestratorDeps {
    pub history: Arc<dyn HistoryRepositoryPort>,
    pub catalog: Arc<dyn CatalogPort>,
    pub destinations: DestinationResolver,
    /// Checked in order; the last entry is the fallback.
    pub strategies: Vec<Arc<dyn TransferStrategy>>,
}

/// Build an orchestrator behind its port.
pub fn build_orchestrator(deps: OrchestratorDeps) -> Arc<TaskOrchestrator> {
    Arc::new(TaskOrchestrator::new(deps))
}

pub struct TaskOrchestrator {
    deps: OrchestratorDeps,
    registry: Arc<Mutex<TaskRegistry>>,
}

impl TaskOrchestrator {
    pub fn new(deps: OrchestratorDeps) -> Self {
        Self {
            deps,
            registry: Arc::new(Mutex::new(TaskRegistry::new())),
        }
    }

    /// Number of tasks currently running or awaiting cancellation.
    pub async fn live_tasks(&self) -> usize {
        self.registry.lock().await.live_count()
    }

    async fn submit_one(&self, request: DownloadRequest) -> Result<SubmitOutcome, CoreError> {
        let request = request.validate()?;
        let platforms = self.deps.catalog.platforms().await?;

        let strategy = select_strategy(&self.deps.strategies, &request.url)
            .cloned()
            .ok_or_else(|| CoreError::Internal("no transfer strategy configured".into()))?;
        let destination = self
            .deps
            .destinations
            .resolve(&platforms, &request.platform, &request.game_name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "cannot derive a file name from '{}'",
                    request.game_name
                ))
            })?;

        let task_id = TaskId::generate();
        let record = HistoryRecord::started(
            &request.platform,
            &request.game_name,
            &request.url,
            request.is_archive,
            task_id.as_str(),
        );
        let history = self.deps.history.append(record).await?;

        let cancel = CancellationToken::new();
        self.registry.lock().await.register(
            task_id.clone(),
            &request.url,
            strategy.name(),
            cancel.clone(),
        );

        let job = TransferJob {
            task_id: task_id.clone(),
            url: request.url.clone(),
            destination,
            is_archive: request.is_archive,
            cancel,
        };
        info!(
            target: "romdl.download",
            task_id = %task_id,
            url = %request.url,
            strategy = strategy.name(),
            "download submitted"
        );
        self.spawn_transfer(strategy, job);

        Ok(SubmitOutcome { task_id, history })
    }

    fn spawn_transfer(&self, strategy: Arc<dyn TransferStrategy>, job: TransferJob) {
        let history = Arc::clone(&self.deps.history);
        let registry = Arc::clone(&self.registry);
        let sink: Arc<dyn ProgressSink> =
            Arc::new(HistoryProgressSink::new(Arc::clone(&history), &job.task_id));

        tokio::spawn(async move {
            let task_id = job.task_id.clone();
            let result = strategy.run(job, sink).await;
            let (outcome, patch) = terminal_patch(&result);

            match &result {
                Ok(()) => info!(target: "romdl.download", task_id = %task_id, "download completed"),
                Err(TransferError::Cancelled) => {
                    info!(target: "romdl.download", task_id = %task_id, "download cancelled");
                }
                Err(e) => {
                    warn!(target: "romdl.download", task_id = %task_id, error = %e, "download failed");
                }
            }

            if let Err(e) = history
                .update_latest(&HistoryKey::task(task_id.as_str()), &patch)
                .await
            {
                warn!(
                    target: "romdl.download",
                    task_id = %task_id,
                    error = %e,
                    "failed to record terminal status"
                );
            }
            registry.lock().await.finish(&task_id, outcome);
        });
    }
}

fn terminal_patch(result: &Result<(), TransferError>) -> (TaskOutcome, HistoryPatch) {
    match result {
        Ok(()) => (
            TaskOutcome::Completed,
            HistoryPatch::terminal(CanonicalStatus::Completed, "Download completed"),
        ),
        Err(TransferError::Cancelled) => (
            TaskOutcome::Canceled,
            HistoryPatch::terminal(CanonicalStatus::Canceled, "Download cancelled"),
        ),
        Err(e) => (
            TaskOutcome::Failed,
            HistoryPatch::terminal(CanonicalStatus::Error, e.to_string()),
        ),
    }
}

#[async_trait]
impl DownloadOrchestratorPort for TaskOrchestrator {
    async fn submit(&self, request: DownloadRequest) -> Result<SubmitOutcome, CoreError> {
        self.submit_one(request).await
    }

    async fn submit_batch(&self, requests: Vec<DownloadRequest>) -> Vec<BatchItemResult> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            let result = self.submit_one(request).await;
            if let Err(ref e) = result {
                warn!(target: "romdl.download", error = %e, "batch item rejected");
            }
            results.push(BatchItemResult::from(result));
        }
        results
    }

    async fn cancel(&self, target: CancelTarget) -> Result<CancelAck, CoreError> {
        let mut registry = self.registry.lock().await;
        let task_id = match target {
            CancelTarget::Task(id) => Some(id),
            CancelTarget::Url(url) => registry.task_for_urls(&url_candidates(&url)),
        };
        let state = task_id.as_ref().map_or(romdl_core::TaskState::NotRunning, |id| {
            registry.request_cancel(id)
        });
        info!(
            target: "romdl.download",
            task_id = task_id.as_ref().map(TaskId::as_str),
            state = ?state,
            "cancel requested"
        );
        Ok(CancelAck {
            ok: true,
            task_id,
            state,
        })
    }

    async fn redownload(&self, url: &str) -> Result<SubmitOutcome, CoreError> {
        let records = self.deps.history.load().await?;
        let key = HistoryKey::Urls(url_candidates(url));
        let entry = latest(&records, &key)
            .ok_or_else(|| CoreError::NotFound(format!("history entry for url {url}")))?;
        if entry.platform.trim().is_empty() || entry.game_name.trim().is_empty() {
            return Err(CoreError::Validation(
                "history entry is missing platform or game_name".into(),
            ));
        }
        let request = DownloadRequest::new(&entry.platform, &entry.game_name, &entry.url)
            .with_archive(entry.is_archive);
        self.submit_one(request).await
    }

    async fn task(&self, id: &TaskId) -> Option<TaskSnapshot> {
        self.registry.lock().await.snapshot(id)
    }
}
