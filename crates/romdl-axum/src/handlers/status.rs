//! Service status handler.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Platform list file is present.
    pub sources: bool,
    /// Game list directory is present.
    pub games_dir: bool,
    pub roms_dir: String,
    pub data_dir: String,
}

pub async fn get(State(state): State<AppState>) -> Json<StatusResponse> {
    let paths = &state.paths;
    let sources = tokio::fs::try_exists(&paths.systems_path).await.unwrap_or(false);
    let games_dir = tokio::fs::try_exists(&paths.games_dir).await.unwrap_or(false);
    Json(StatusResponse {
        sources,
        games_dir,
        roms_dir: paths.roms_dir.display().to_string(),
        data_dir: paths.data_root.display().to_string(),
    })
}
