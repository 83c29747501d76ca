//! CLI bootstrap - the composition root for the read-side commands.
//!
//! `serve` wires its own context through `romdl_axum::bootstrap`.

use std::sync::Arc;

use romdl_core::{CatalogPort, HistoryRepositoryPort, ResolvedPaths};
use romdl_download::{DestinationResolver, HistoryQueries, Reconciler};
use romdl_store::{JsonCatalog, JsonHistoryStore};

/// Services needed by `history` and `progress`.
pub struct CliContext {
    pub paths: ResolvedPaths,
    pub queries: HistoryQueries,
}

pub fn bootstrap(paths: ResolvedPaths) -> CliContext {
    let history: Arc<dyn HistoryRepositoryPort> =
        Arc::new(JsonHistoryStore::new(&paths.history_path));
    let catalog: Arc<dyn CatalogPort> =
        Arc::new(JsonCatalog::new(&paths.systems_path, &paths.games_dir));
    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(&history),
        catalog,
        DestinationResolver::new(&paths.roms_dir),
    ));
    CliContext {
        queries: HistoryQueries::new(history, reconciler),
        paths,
    }
}
