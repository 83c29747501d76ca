//! Transfer strategies.
//!
//! A strategy performs the byte transfer for one task and reports counters
//! through a [`ProgressSink`]. It never writes a terminal status itself;
//! the orchestrator does that from the returned result.

mod direct;
mod gated;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use romdl_core::{TaskId, TransferResult};

pub use direct::DirectHttpStrategy;
pub use gated::GatedHostStrategy;

/// Everything a strategy needs to run one task.
///
/// A value type with no references back to the orchestrator.
#[derive(Clone, Debug)]
pub struct TransferJob {
    pub task_id: TaskId,
    pub url: String,
    pub destination: PathBuf,
    pub is_archive: bool,
    /// Checked between chunks; cancellation is cooperative.
    pub cancel: CancellationToken,
}

/// Receives progress counters from a running transfer.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    async fn report(&self, downloaded: u64, total: Option<u64>, speed: f64);
}

#[async_trait]
pub trait TransferStrategy: Send + Sync {
    /// Short name used in logs and task snapshots.
    fn name(&self) -> &'static str;

    /// Whether this strategy handles `url`.
    fn matches(&self, url: &str) -> bool;

    async fn run(&self, job: TransferJob, sink: Arc<dyn ProgressSink>) -> TransferResult<()>;
}

/// First strategy whose predicate matches, else the last one.
pub(crate) fn select_strategy<'a>(
    strategies: &'a [Arc<dyn TransferStrategy>],
    url: &str,
) -> Option<&'a Arc<dyn TransferStrategy>> {
    strategies
        .iter()
        .find(|s| s.matches(url))
        .or_else(|| strategies.last())
}

/// Lower-cased host of `url`, if it parses.
pub(crate) fn url_host(url: &str) -> Option<String> {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase))
}
