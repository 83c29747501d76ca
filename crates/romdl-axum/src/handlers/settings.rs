//! Gated-host API key handlers. The key itself is never returned.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::HttpError;
use crate::extract::ApiJson;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GatedKeyStatus {
    pub present: bool,
    pub length: usize,
}

#[derive(Debug, Deserialize)]
pub struct GatedKeyUpdate {
    #[serde(default)]
    pub api_key: String,
}

#[derive(Debug, Serialize)]
pub struct GatedKeyUpdated {
    pub ok: bool,
    pub present: bool,
}

pub async fn get_gated_key(
    State(state): State<AppState>,
) -> Result<Json<GatedKeyStatus>, HttpError> {
    let key = state.credentials.load().await?;
    Ok(Json(GatedKeyStatus {
        present: key.is_some(),
        length: key.map_or(0, |k| k.chars().count()),
    }))
}

/// Store or clear the key; a blank key clears it.
pub async fn set_gated_key(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GatedKeyUpdate>,
) -> Result<Json<GatedKeyUpdated>, HttpError> {
    let key = req.api_key.trim();
    state.credentials.store(key).await?;
    Ok(Json(GatedKeyUpdated {
        ok: true,
        present: !key.is_empty(),
    }))
}
