//! Download orchestration for romdl.
//!
//! - `orchestrator` - Task submission, cancellation and the task registry
//! - `strategy` - Pluggable transfer strategies (direct HTTP, gated host)
//! - `progress` - History-backed progress reporting with throttling
//! - `reconcile` - File-presence repair of stale History entries
//! - `queries` - Read-side progress and history queries
//! - `destination` - On-disk destination resolution

#![deny(unused_crate_dependencies)]

mod destination;
mod orchestrator;
mod progress;
mod queries;
mod reconcile;
mod strategy;

pub use destination::DestinationResolver;
pub use orchestrator::{OrchestratorDeps, TaskOrchestrator, build_orchestrator};
pub use progress::{HistoryProgressSink, ProgressThrottle};
pub use queries::HistoryQueries;
pub use reconcile::{Reconciler, url_candidates};
pub use strategy::{
    DirectHttpStrategy, GatedHostStrategy, ProgressSink, TransferJob, TransferStrategy,
};

// Re-export core types for convenience
pub use romdl_core::download::{
    BatchItemResult, CancelAck, CancelTarget, DownloadRequest, SubmitOutcome, TaskId,
    TaskOutcome, TaskSnapshot, TaskState, TransferError,
};
pub use romdl_core::ports::DownloadOrchestratorPort;
