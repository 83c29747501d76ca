//! Canonical download status taxonomy.
//!
//! Transfer engines and older history files write a variety of raw status
//! strings (including French locale variants). Everything that leaves this
//! crate is expressed as a [`CanonicalStatus`]; raw strings are only ever
//! interpreted through [`RAW_STATUS_SYNONYMS`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of externally meaningful progress states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalStatus {
    /// Bytes are being transferred.
    Downloading,
    /// Transfer finished, archive is being unpacked.
    Extracting,
    /// Artifact is in place.
    Completed,
    /// Transfer or extraction failed.
    Error,
    /// Cancelled on request.
    Canceled,
    /// Raw status was missing or not recognised.
    Unknown,
}

/// Lower-cased raw status strings and the canonical value each maps to.
pub const RAW_STATUS_SYNONYMS: &[(&str, CanonicalStatus)] = &[
    ("download_ok", CanonicalStatus::Completed),
    ("completed", CanonicalStatus::Completed),
    ("complete", CanonicalStatus::Completed),
    ("done", CanonicalStatus::Completed),
    ("terminé", CanonicalStatus::Completed),
    ("erreur", CanonicalStatus::Error),
    ("error", CanonicalStatus::Error),
    ("failed", CanonicalStatus::Error),
    ("extracting", CanonicalStatus::Extracting),
    ("extraction", CanonicalStatus::Extracting),
    ("telechargement", CanonicalStatus::Downloading),
    ("téléchargement", CanonicalStatus::Downloading),
    ("downloading", CanonicalStatus::Downloading),
    ("canceled", CanonicalStatus::Canceled),
    ("cancelled", CanonicalStatus::Canceled),
    ("annulé", CanonicalStatus::Canceled),
];

impl CanonicalStatus {
    /// Map a raw status string onto the canonical taxonomy.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace.
    /// Unrecognised values yield [`CanonicalStatus::Unknown`].
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        RAW_STATUS_SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == lowered)
            .map_or(Self::Unknown, |(_, status)| *status)
    }

    /// Raw string written into history for this status.
    ///
    /// Uses the transfer engine's legacy vocabulary so files stay readable
    /// by both sides.
    #[must_use]
    pub const fn raw(self) -> &'static str {
        match self {
            Self::Downloading => "downloading",
            Self::Extracting => "Extracting",
            Self::Completed => "Download_OK",
            Self::Error => "Erreur",
            Self::Canceled => "Canceled",
            Self::Unknown => "unknown",
        }
    }

    /// Stable lower-case name used in API payloads and filters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Downloading => "downloading",
            Self::Extracting => "extracting",
            Self::Completed => "completed",
            Self::Error => "error",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }

    /// Whether no further progress is expected.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Error | Self::Canceled)
    }

    /// Parse a filter value supplied by a client (`?status=completed`).
    ///
    /// Accepts canonical names as well as any raw synonym.
    #[must_use]
    pub fn parse_filter(value: &str) -> Self {
        Self::from_raw(value)
    }
}

impl fmt::Display for CanonicalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
