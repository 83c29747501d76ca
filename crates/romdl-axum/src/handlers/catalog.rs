//! Platform and game listing handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use romdl_core::{GameSize, PlatformDescriptor};

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PlatformDto {
    pub platform: String,
    pub id: String,
    pub name: Option<String>,
    pub folder: Option<String>,
    pub system_image: Option<String>,
}

impl From<PlatformDescriptor> for PlatformDto {
    fn from(p: PlatformDescriptor) -> Self {
        Self {
            id: p.platform.clone(),
            platform: p.platform,
            name: p.name,
            folder: p.folder,
            system_image: p.system_image,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GameDto {
    pub name: String,
    pub url: String,
    pub size: Option<GameSize>,
    /// Some History entry for this URL is completed.
    pub completed: bool,
}

pub async fn platforms(State(state): State<AppState>) -> Result<Json<Vec<PlatformDto>>, HttpError> {
    let platforms = state.catalog.platforms().await?;
    Ok(Json(platforms.into_iter().map(PlatformDto::from).collect()))
}

pub async fn games(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<GameDto>>, HttpError> {
    let games = state.catalog.games(&id).await?;
    let completed = state.queries.completed_urls().await?;
    Ok(Json(
        games
            .into_iter()
            .map(|g| GameDto {
                completed: completed.contains(&g.url),
                name: g.name,
                url: g.url,
                size: g.size,
            })
            .collect(),
    ))
}
