//! Task state handler.

use axum::Json;
use axum::extract::{Path, State};

use romdl_core::{TaskId, TaskSnapshot};

use crate::error::HttpError;
use crate::state::AppState;

/// Current state of a task, including recently finished ones.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskSnapshot>, HttpError> {
    let id = TaskId::from(id.as_str());
    state
        .orchestrator
        .task(&id)
        .await
        .map(Json)
        .ok_or_else(|| HttpError::NotFound(format!("task {id}")))
}
