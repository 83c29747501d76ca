//! JSON file implementation of the `CatalogPort` trait.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use romdl_core::{CatalogError, CatalogGame, CatalogPort, PlatformDescriptor, parse_game_list};

/// Catalog backed by `systems.json` and a `games/` directory.
///
/// The platform list is loaded once, on first use. Game lists are read on
/// every call so replaced files are picked up without a restart.
pub struct JsonCatalog {
    systems_path: PathBuf,
    games_dir: PathBuf,
    platforms: OnceCell<Vec<PlatformDescriptor>>,
}

impl JsonCatalog {
    pub fn new(systems_path: impl Into<PathBuf>, games_dir: impl Into<PathBuf>) -> Self {
        Self {
            systems_path: systems_path.into(),
            games_dir: games_dir.into(),
            platforms: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn systems_path(&self) -> &Path {
        &self.systems_path
    }

    #[must_use]
    pub fn games_dir(&self) -> &Path {
        &self.games_dir
    }

    async fn load_platforms(&self) -> Result<Vec<PlatformDescriptor>, CatalogError> {
        let bytes = match tokio::fs::read(&self.systems_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::NotLoaded(format!(
                    "{} does not exist",
                    self.systems_path.display()
                )));
            }
            Err(e) => return Err(CatalogError::Io(e.to_string())),
        };
        let platforms: Vec<PlatformDescriptor> =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;
        info!(target: "romdl.download", count = platforms.len(), "catalog platforms loaded");
        Ok(platforms)
    }

    fn games_path(&self, platform_id: &str) -> Option<PathBuf> {
        let id = platform_id.trim();
        let traverses = id.is_empty()
            || id.contains(['/', '\\'])
            || id == "."
            || id == "..";
        (!traverses).then(|| self.games_dir.join(format!("{id}.json")))
    }
}

#[async_trait]
impl CatalogPort for JsonCatalog {
    async fn platforms(&self) -> Result<Vec<PlatformDescriptor>, CatalogError> {
        self.platforms
            .get_or_try_init(|| self.load_platforms())
            .await
            .cloned()
    }

    async fn games(&self, platform_id: &str) -> Result<Vec<CatalogGame>, CatalogError> {
        let path = self
            .games_path(platform_id)
            .ok_or_else(|| CatalogError::PlatformNotFound(platform_id.to_string()))?;
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CatalogError::PlatformNotFound(platform_id.to_string()));
            }
            Err(e) => return Err(CatalogError::Io(e.to_string())),
        };
        let document: Value =
            serde_json::from_slice(&bytes).map_err(|e| CatalogError::Parse(e.to_string()))?;
        let games = parse_game_list(&document);
        debug!(target: "romdl.download", platform = platform_id, count = games.len(), "game list read");
        Ok(games)
    }
}
