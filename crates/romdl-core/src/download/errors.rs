//! Transfer error types.
//!
//! These errors are serializable and do not depend on external error types
//! like `std::io::Error`. For I/O errors, we capture the kind and message
//! as strings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error reported by a transfer strategy.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum TransferError {
    /// The task observed a cancellation request.
    #[error("Download cancelled")]
    Cancelled,

    /// Network/HTTP error during download.
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        status_code: Option<u16>,
    },

    /// I/O error while writing the artifact.
    #[error("I/O error ({kind}): {message}")]
    Io { kind: String, message: String },

    /// The strategy needs a credential that is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// General/uncategorized error.
    #[error("{message}")]
    Other { message: String },
}

impl TransferError {
    /// Create an I/O error from a `std::io::Error`.
    #[must_use]
    pub fn from_io_error(err: &std::io::Error) -> Self {
        let kind = err.kind();
        Self::Io {
            kind: format!("{kind:?}"),
            message: err.to_string(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
            status_code: None,
        }
    }

    pub fn network_with_status(message: impl Into<String>, status_code: u16) -> Self {
        Self::Network {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<std::io::Error> for TransferError {
    fn from(err: std::io::Error) -> Self {
        Self::from_io_error(&err)
    }
}

/// Result type for transfer operations.
pub type TransferResult<T> = Result<T, TransferError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_keep_kind() {
        let err: TransferError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
        assert!(matches!(err, TransferError::Io { ref kind, .. } if kind == "PermissionDenied"));
    }

    #[test]
    fn display_messages() {
        assert_eq!(TransferError::Cancelled.to_string(), "Download cancelled");
        assert_eq!(
            TransferError::network_with_status("HTTP 404", 404).to_string(),
            "Network error: HTTP 404"
        );
    }
}
