//! Root directory resolution.

use std::env;
use std::path::{Path, PathBuf};

use super::error::PathError;

/// Environment override for the data root.
pub const DATA_DIR_ENV: &str = "ROMDL_DATA_DIR";

/// Environment override for the ROMs directory.
pub const ROMS_DIR_ENV: &str = "ROMDL_ROMS_DIR";

/// Get the root directory for application data.
///
/// Resolution order:
/// 1. `ROMDL_DATA_DIR` environment variable
/// 2. System data directory (e.g., `~/.local/share/romdl`)
///
/// The directory is not created here; writers create it on first save.
pub fn data_root() -> Result<PathBuf, PathError> {
    if let Some(path) = env_path(DATA_DIR_ENV) {
        return normalize_user_path(&path);
    }
    let data_dir = dirs::data_local_dir().ok_or(PathError::NoDataDir)?;
    Ok(data_dir.join("romdl"))
}

/// Get the ROMs directory, honouring `ROMDL_ROMS_DIR`.
pub fn roms_dir() -> Result<PathBuf, PathError> {
    let root = data_root()?;
    roms_dir_in(&root)
}

/// ROMs directory relative to an explicit data root.
pub fn roms_dir_in(data_root: &Path) -> Result<PathBuf, PathError> {
    match env_path(ROMS_DIR_ENV) {
        Some(path) => normalize_user_path(&path),
        None => Ok(data_root.join("roms")),
    }
}

fn env_path(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Normalize a user-provided path, expanding `~` and making it absolute.
pub(super) fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::test_utils::{ENV_LOCK, EnvVarGuard};

    #[test]
    fn data_root_honours_env_override() {
        let _lock = ENV_LOCK.lock().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let _env = EnvVarGuard::set(DATA_DIR_ENV, tmp.path().to_str().unwrap());
        assert_eq!(data_root().unwrap(), tmp.path());
    }

    #[test]
    fn roms_dir_defaults_under_data_root() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::unset(ROMS_DIR_ENV);
        let root = Path::new("/srv/romdl");
        assert_eq!(roms_dir_in(root).unwrap(), root.join("roms"));
    }

    #[test]
    fn roms_dir_override_wins() {
        let _lock = ENV_LOCK.lock().unwrap();
        let _env = EnvVarGuard::set(ROMS_DIR_ENV, "/mnt/roms");
        assert_eq!(
            roms_dir_in(Path::new("/srv/romdl")).unwrap(),
            PathBuf::from("/mnt/roms")
        );
    }

    #[test]
    fn tilde_expands_to_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(normalize_user_path("~/roms").unwrap(), home.join("roms"));
        assert!(matches!(normalize_user_path("  "), Err(PathError::EmptyPath)));
    }
}
