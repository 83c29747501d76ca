//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the web adapter. All concrete implementations are instantiated here.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use romdl_core::{
    CatalogPort, CredentialStorePort, DownloadOrchestratorPort, HistoryRepositoryPort,
    RateLimiter, ResolvedPaths, Settings, ensure_directory,
};
use romdl_download::{
    DestinationResolver, DirectHttpStrategy, GatedHostStrategy, HistoryQueries,
    OrchestratorDeps, Reconciler, TransferStrategy, build_orchestrator,
};
use romdl_store::{FileCredentialStore, JsonCatalog, JsonHistoryStore};
use tracing::info;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8000;

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Static UI served under `/web`.
    pub static_dir: Option<PathBuf>,
    /// Skip static serving even when `static_dir` is set.
    pub api_only: bool,
    pub cors: CorsConfig,
    pub paths: ResolvedPaths,
    pub settings: Settings,
}

impl ServerConfig {
    /// Config for explicit paths and settings.
    pub fn new(paths: ResolvedPaths, settings: Settings) -> Self {
        Self {
            port: DEFAULT_PORT,
            static_dir: None,
            api_only: false,
            cors: CorsConfig::default(),
            paths,
            settings,
        }
    }

    /// Config with paths and settings resolved from the environment.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(ResolvedPaths::resolve()?, Settings::from_env()))
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the static directory served under `/web`.
    #[must_use]
    pub fn with_static_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(path.into());
        self
    }

    #[must_use]
    pub const fn with_api_only(mut self, api_only: bool) -> Self {
        self.api_only = api_only;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    /// Static directory to serve, if any.
    pub fn served_static_dir(&self) -> Option<&PathBuf> {
        self.static_dir.as_ref().filter(|_| !self.api_only)
    }
}

/// Application context for the Axum adapter.
///
/// Holds every initialized service; constructed once by [`bootstrap`].
pub struct AxumContext {
    pub paths: ResolvedPaths,
    pub settings: Settings,
    pub orchestrator: Arc<dyn DownloadOrchestratorPort>,
    pub queries: Arc<HistoryQueries>,
    pub catalog: Arc<dyn CatalogPort>,
    pub credentials: Arc<dyn CredentialStorePort>,
    pub rate_limiter: RateLimiter,
}

/// Wire stores, strategies and services for `config`.
pub fn bootstrap(config: &ServerConfig) -> Result<AxumContext> {
    let paths = config.paths.clone();
    ensure_directory(&paths.data_root)?;
    ensure_directory(&paths.roms_dir)?;

    info!(
        target: "romdl.http",
        data_root = %paths.data_root.display(),
        roms_dir = %paths.roms_dir.display(),
        history = %paths.history_path.display(),
        auth_enabled = config.settings.auth_enabled(),
        rate_limit = config.settings.rate_limit.is_enabled(),
        "bootstrap resolved paths"
    );

    let history: Arc<dyn HistoryRepositoryPort> =
        Arc::new(JsonHistoryStore::new(&paths.history_path));
    let catalog: Arc<dyn CatalogPort> =
        Arc::new(JsonCatalog::new(&paths.systems_path, &paths.games_dir));
    let credentials: Arc<dyn CredentialStorePort> =
        Arc::new(FileCredentialStore::new(&paths.gated_key_path));
    let destinations = DestinationResolver::new(&paths.roms_dir);

    let direct = DirectHttpStrategy::with_default_client()?;
    let strategies: Vec<Arc<dyn TransferStrategy>> = vec![
        Arc::new(GatedHostStrategy::new(
            config.settings.gated_hosts.clone(),
            Arc::clone(&credentials),
            direct.clone(),
        )),
        Arc::new(direct),
    ];

    let orchestrator = build_orchestrator(OrchestratorDeps {
        history: Arc::clone(&history),
        catalog: Arc::clone(&catalog),
        destinations: destinations.clone(),
        strategies,
    });
    let reconciler = Arc::new(Reconciler::new(
        Arc::clone(&history),
        Arc::clone(&catalog),
        destinations,
    ));
    let queries = Arc::new(HistoryQueries::new(history, reconciler));

    Ok(AxumContext {
        paths,
        settings: config.settings.clone(),
        orchestrator,
        queries,
        catalog,
        credentials,
        rate_limiter: RateLimiter::new(config.settings.rate_limit),
    })
}

/// Start the web server on the configured port.
pub async fn start_server(config: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;

    let ctx = bootstrap(&config)?;
    let app = crate::routes::create_router(ctx, &config);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;

    match config.served_static_dir() {
        Some(dir) => info!(
            target: "romdl.http",
            static_dir = %dir.display(),
            "romdl web server (with UI) listening on http://{addr}"
        ),
        None => info!(target: "romdl.http", "romdl web server (API only) listening on http://{addr}"),
    }

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
