//! Serve command handler.

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use romdl_axum::{ServerConfig, start_server};
use romdl_core::{ResolvedPaths, Settings};

/// Start the web server until it exits.
pub async fn execute(
    paths: ResolvedPaths,
    port: u16,
    static_dir: Option<PathBuf>,
    api_only: bool,
) -> Result<()> {
    let mut config = ServerConfig::new(paths, Settings::from_env())
        .with_port(port)
        .with_api_only(api_only);
    if let Some(dir) = static_dir {
        config = config.with_static_dir(dir);
    }
    info!(port, api_only, "starting romdl web server");
    start_server(config).await
}
