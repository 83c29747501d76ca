//! Core domain for romdl, a ROM download manager service.
//!
//! This crate holds the History model and Status Normalizer, catalog types
//! and search, the Rate Limiter, task and cancellation types, the error
//! taxonomy, port traits implemented by adapter crates, and path and
//! settings resolution. It performs no HTTP and owns no runtime.

#![deny(unused_crate_dependencies)]

pub mod catalog;
pub mod download;
pub mod history;
pub mod paths;
pub mod ports;
pub mod rate_limit;
pub mod settings;

pub use catalog::{
    CatalogGame, DEFAULT_SEARCH_LIMIT, GameSize, PlatformDescriptor, PlatformGame, SearchQuery,
    normalize_platform_name, parse_game_list, sanitize_filename, search_catalog,
};
pub use download::{
    BatchItemResult, CancelAck, CancelTarget, DownloadRequest, SubmitOutcome, TaskId,
    TaskOutcome, TaskSnapshot, TaskState, TransferError, TransferResult, ValidatedRequest,
};
pub use history::{
    CanonicalStatus, HistoryKey, HistoryPatch, HistoryRecord, ProgressView, RECENT_PROGRESS_LEN,
    normalize,
};
pub use paths::{PathError, ResolvedPaths, data_root, ensure_directory, roms_dir};
pub use ports::{
    CatalogError, CatalogPort, CoreError, CredentialStorePort, DownloadOrchestratorPort,
    HistoryRepositoryPort, RepositoryError, find_platform,
};
pub use rate_limit::{RateLimitSpec, RateLimiter};
pub use settings::Settings;
