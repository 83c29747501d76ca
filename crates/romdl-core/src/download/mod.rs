//! Download task domain types and errors.
//!
//! Pure data types for submission, task lifecycle and cancellation. No I/O,
//! networking, or runtime dependencies allowed.
//!
//! # Structure
//!
//! - `types` - Task identifiers, requests and submission outcomes
//! - `state` - Task lifecycle and cancellation acknowledgements
//! - `errors` - Error types reported by transfer strategies

pub mod errors;
pub mod state;
pub mod types;

pub use errors::{TransferError, TransferResult};
pub use state::{CancelAck, CancelTarget, TaskOutcome, TaskSnapshot, TaskState};
pub use types::{BatchItemResult, DownloadRequest, SubmitOutcome, TaskId, ValidatedRequest};
