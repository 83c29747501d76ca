//! On-disk destination resolution.

use std::path::{Path, PathBuf};

use romdl_core::{PlatformDescriptor, find_platform, normalize_platform_name, sanitize_filename};

/// Maps `(platform, game_name)` to `<roms>/<folder>/<sanitized name>`.
#[derive(Clone, Debug)]
pub struct DestinationResolver {
    roms_dir: PathBuf,
}

impl DestinationResolver {
    pub fn new(roms_dir: impl Into<PathBuf>) -> Self {
        Self {
            roms_dir: roms_dir.into(),
        }
    }

    #[must_use]
    pub fn roms_dir(&self) -> &Path {
        &self.roms_dir
    }

    /// Destination path, or `None` when the name sanitizes to nothing.
    ///
    /// The folder comes from the catalog entry for `platform` when present,
    /// otherwise from [`normalize_platform_name`].
    #[must_use]
    pub fn resolve(
        &self,
        platforms: &[PlatformDescriptor],
        platform: &str,
        game_name: &str,
    ) -> Option<PathBuf> {
        let file_name = sanitize_filename(game_name);
        if file_name.is_empty() {
            return None;
        }
        let folder = find_platform(platforms, platform).map_or_else(
            || normalize_platform_name(platform),
            PlatformDescriptor::effective_folder,
        );
        if folder.is_empty() {
            return None;
        }
        Some(self.roms_dir.join(folder).join(file_name))
    }
}
