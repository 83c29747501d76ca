//! Well-known files under the data root.

use std::path::{Path, PathBuf};

pub const HISTORY_FILE: &str = "history.json";
pub const SYSTEMS_FILE: &str = "systems.json";
pub const GATED_KEY_FILE: &str = "gated_host_api_key.txt";

#[must_use]
pub fn history_path_in(data_root: &Path) -> PathBuf {
    data_root.join(HISTORY_FILE)
}

/// Platform list.
#[must_use]
pub fn systems_path_in(data_root: &Path) -> PathBuf {
    data_root.join(SYSTEMS_FILE)
}

/// Directory holding one `<platform>.json` game list per platform.
#[must_use]
pub fn games_dir_in(data_root: &Path) -> PathBuf {
    data_root.join("games")
}

#[must_use]
pub fn gated_key_path_in(data_root: &Path) -> PathBuf {
    data_root.join(GATED_KEY_FILE)
}
