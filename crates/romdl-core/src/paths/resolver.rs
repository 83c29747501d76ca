//! Resolved path set for CLI introspection and composition roots.

use std::path::PathBuf;

use super::{
    PathError, data_root, games_dir_in, gated_key_path_in, history_path_in, roms_dir_in,
    systems_path_in,
};

/// All resolved paths captured in a single struct.
///
/// Use this for the `romdl paths` command and when wiring adapters, so
/// every component agrees on one set of locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub data_root: PathBuf,
    pub roms_dir: PathBuf,
    pub history_path: PathBuf,
    pub systems_path: PathBuf,
    pub games_dir: PathBuf,
    pub gated_key_path: PathBuf,
}

impl ResolvedPaths {
    /// Resolve all paths using the current environment.
    pub fn resolve() -> Result<Self, PathError> {
        Self::from_data_root(data_root()?)
    }

    /// Resolve relative to an explicit data root.
    pub fn from_data_root(data_root: PathBuf) -> Result<Self, PathError> {
        let roms_dir = roms_dir_in(&data_root)?;
        Ok(Self {
            history_path: history_path_in(&data_root),
            systems_path: systems_path_in(&data_root),
            games_dir: games_dir_in(&data_root),
            gated_key_path: gated_key_path_in(&data_root),
            roms_dir,
            data_root,
        })
    }
}

impl std::fmt::Display for ResolvedPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "data_root = {}", self.data_root.display())?;
        writeln!(f, "roms_dir = {}", self.roms_dir.display())?;
        writeln!(f, "history_path = {}", self.history_path.display())?;
        writeln!(f, "systems_path = {}", self.systems_path.display())?;
        writeln!(f, "games_dir = {}", self.games_dir.display())?;
        write!(f, "gated_key_path = {}", self.gated_key_path.display())
    }
}
