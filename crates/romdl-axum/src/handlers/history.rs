//! History query handler.

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use romdl_core::{CanonicalStatus, HistoryRecord};

use crate::error::HttpError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub status: Option<String>,
    #[serde(default)]
    pub limit: usize,
}

/// Raw records filtered by canonical status; `limit` keeps the most recent.
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryRecord>>, HttpError> {
    let filter = q
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(CanonicalStatus::parse_filter);
    Ok(Json(state.queries.history(filter, q.limit).await?))
}
