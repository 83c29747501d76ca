//! Progress query handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use romdl_core::ProgressView;

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub url: Option<String>,
}

/// A single reconciled record, or the recent list when no URL is given.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProgressResponse {
    Single(ProgressView),
    Recent(Vec<ProgressView>),
}

pub async fn get(
    State(state): State<AppState>,
    Query(q): Query<ProgressQuery>,
) -> Result<Json<ProgressResponse>, HttpError> {
    let response = match q.url.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        Some(url) => ProgressResponse::Single(state.queries.progress(url).await?),
        None => ProgressResponse::Recent(state.queries.recent().await?),
    };
    Ok(Json(response))
}
