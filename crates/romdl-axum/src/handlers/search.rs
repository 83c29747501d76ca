//! Catalog search handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use romdl_core::{DEFAULT_SEARCH_LIMIT, PlatformGame, SearchQuery, search_catalog};

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    pub platform_id: Option<String>,
    pub limit: Option<usize>,
}

/// Search game names across platforms. `limit=0` means unlimited.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<PlatformGame>>, HttpError> {
    if params.q.trim().is_empty() {
        return Err(HttpError::BadRequest("q is required".into()));
    }
    let mut query =
        SearchQuery::new(params.q).with_limit(params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT));
    if let Some(pid) = params.platform_id {
        query = query.with_platform(pid);
    }
    let results = search_catalog(state.catalog.as_ref(), &query).await?;
    tracing::debug!(target: "romdl.http", query = %query.query, hits = results.len(), "search");
    Ok(Json(results))
}
