//! Path utilities for romdl data directories.
//!
//! This module provides the canonical path resolution for all romdl components:
//! - Data root (History file, catalog, credentials)
//! - ROMs directory (download destinations)
//!
//! # Design
//!
//! - Returns `PathBuf` and `PathError` for clear error handling
//! - No interactive/terminal I/O - adapters handle user prompts separately
//! - Every resolver has an `_in` variant taking an explicit root for tests

mod ensure;
mod error;
mod files;
mod platform;
mod resolver;

#[cfg(test)]
pub(crate) mod test_utils;

pub use ensure::ensure_directory;
pub use error::PathError;
pub use files::{
    GATED_KEY_FILE, HISTORY_FILE, SYSTEMS_FILE, games_dir_in, gated_key_path_in, history_path_in,
    systems_path_in,
};
pub use platform::{DATA_DIR_ENV, ROMS_DIR_ENV, data_root, roms_dir, roms_dir_in};
pub use resolver::ResolvedPaths;
