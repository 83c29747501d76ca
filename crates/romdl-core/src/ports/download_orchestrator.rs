//! Download orchestrator port definition.
//!
//! This port defines the public interface for task submission and
//! cancellation. It hides cancellation tokens, spawned task handles and
//! transfer strategies behind an intent-based async API.

use async_trait::async_trait;

use super::CoreError;
use crate::download::{
    BatchItemResult, CancelAck, CancelTarget, DownloadRequest, SubmitOutcome, TaskId, TaskSnapshot,
};

#[async_trait]
pub trait DownloadOrchestratorPort: Send + Sync {
    /// Validate, record and launch one download.
    async fn submit(&self, request: DownloadRequest) -> Result<SubmitOutcome, CoreError>;

    /// Submit each request independently, preserving input order.
    async fn submit_batch(&self, requests: Vec<DownloadRequest>) -> Vec<BatchItemResult>;

    /// Request cooperative cancellation. Idempotent.
    async fn cancel(&self, target: CancelTarget) -> Result<CancelAck, CoreError>;

    /// Re-submit the latest History entry for `url`.
    async fn redownload(&self, url: &str) -> Result<SubmitOutcome, CoreError>;

    /// Current state of a known task.
    async fn task(&self, id: &TaskId) -> Option<TaskSnapshot>;
}
