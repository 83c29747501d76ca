//! Download handlers - submit, batch submit, cancel and redownload.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use romdl_core::{BatchItemResult, CancelAck, CancelTarget, DownloadRequest, SubmitOutcome};

use crate::error::HttpError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// Batch submission body. Items are parsed individually so one malformed
/// entry is reported in place instead of rejecting the whole batch.
#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    #[serde(default)]
    pub downloads: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub tasks: Vec<BatchItemResult>,
}

#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    #[serde(default, alias = "taskId")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedownloadRequest {
    #[serde(default)]
    pub url: String,
}

/// Submit one download.
pub async fn submit(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<DownloadRequest>,
) -> Result<Json<SubmitOutcome>, HttpError> {
    Ok(Json(state.orchestrator.submit(req).await?))
}

/// Submit several downloads; results keep the input order.
pub async fn submit_batch(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BatchRequest>,
) -> Json<BatchResponse> {
    let mut parsed = Vec::new();
    let mut slots = Vec::with_capacity(req.downloads.len());
    for item in req.downloads {
        match serde_json::from_value::<DownloadRequest>(item) {
            Ok(request) => {
                parsed.push(request);
                slots.push(None);
            }
            Err(e) => slots.push(Some(BatchItemResult::Failed {
                error: format!("invalid download entry: {e}"),
            })),
        }
    }

    let mut submitted = state.orchestrator.submit_batch(parsed).await.into_iter();
    let tasks = slots
        .into_iter()
        .map(|slot| {
            slot.or_else(|| submitted.next())
                .unwrap_or_else(|| BatchItemResult::Failed {
                    error: "missing batch result".into(),
                })
        })
        .collect();
    Json(BatchResponse { tasks })
}

/// Request cancellation by task id or URL.
pub async fn cancel(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CancelRequest>,
) -> Result<Json<CancelAck>, HttpError> {
    let target = CancelTarget::from_parts(req.task_id.as_deref(), req.url.as_deref())
        .ok_or_else(|| HttpError::BadRequest("task_id or url is required".into()))?;
    Ok(Json(state.orchestrator.cancel(target).await?))
}

/// Resubmit the latest History entry for a URL.
pub async fn redownload(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RedownloadRequest>,
) -> Result<Json<SubmitOutcome>, HttpError> {
    let url = req.url.trim();
    if url.is_empty() {
        return Err(HttpError::BadRequest("url is required".into()));
    }
    Ok(Json(state.orchestrator.redownload(url).await?))
}
