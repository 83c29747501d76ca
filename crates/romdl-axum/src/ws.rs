//! WebSocket Progress Streamer.
//!
//! `GET /ws/progress?url=...&api_key=...` upgrades to a WebSocket that
//! receives the reconciled progress view of `url` at a fixed cadence.
//!
//! ## Lifecycle
//!
//! 1. The key is checked after the upgrade; a mismatch closes with code
//!    4401 so browsers can tell it apart from network failures.
//! 2. Every tick runs reconciliation and sends the view as a text frame.
//! 3. The first terminal view (completed, error, canceled) is sent, then
//!    the socket is closed normally.
//! 4. A client disconnect ends the loop silently.

use std::borrow::Cow;

use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code};
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use romdl_core::ProgressView;

use crate::middleware::{key_accepted, supplied_key};
use crate::state::AppState;

/// Close code sent when the API key is missing or wrong.
pub const CLOSE_UNAUTHORIZED: u16 = 4401;

#[derive(Debug, Deserialize)]
pub struct StreamParams {
    #[serde(default)]
    pub url: String,
    pub api_key: Option<String>,
}

/// `GET /ws/progress` upgrade endpoint.
pub async fn progress_ws(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<StreamParams>,
) -> impl IntoResponse {
    let supplied = params
        .api_key
        .as_deref()
        .map(|k| Cow::Borrowed(k.trim()))
        .or_else(|| supplied_key(&headers, None));
    let authorized = key_accepted(state.settings.api_key.as_deref(), supplied.as_deref());
    let url = params.url.trim().to_string();

    ws.on_upgrade(move |mut socket| async move {
        if !authorized {
            warn!(target: "romdl.http", "progress stream rejected - invalid api key");
            let _ = socket.send(close(CLOSE_UNAUTHORIZED, "invalid api key")).await;
            return;
        }
        if url.is_empty() {
            let _ = socket.send(close(close_code::POLICY, "url is required")).await;
            return;
        }
        stream_progress(socket, state, url).await;
    })
}

async fn stream_progress(socket: WebSocket, state: AppState, url: String) {
    debug!(target: "romdl.http", url = %url, "progress stream opened");
    let (mut sender, mut receiver) = socket.split();
    let mut ticker = tokio::time::interval(state.settings.stream_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let view = match state.queries.progress(&url).await {
                    Ok(view) => view,
                    Err(e) => {
                        warn!(target: "romdl.http", url = %url, error = %e, "progress stream query failed");
                        let _ = sender.send(close(close_code::ERROR, "progress unavailable")).await;
                        break;
                    }
                };
                let terminal = view.status.is_terminal();
                let Some(frame) = progress_frame(&view) else {
                    break;
                };
                if sender.send(frame).await.is_err() {
                    break;
                }
                if terminal {
                    let _ = sender.send(close(close_code::NORMAL, "")).await;
                    break;
                }
            }
            incoming = receiver.next() => match incoming {
                None | Some(Err(_) | Ok(Message::Close(_))) => break,
                Some(Ok(_)) => {}
            },
        }
    }
    debug!(target: "romdl.http", url = %url, "progress stream closed");
}

fn progress_frame(view: &ProgressView) -> Option<Message> {
    match serde_json::to_string(view) {
        Ok(text) => Some(Message::Text(text.into())),
        Err(e) => {
            warn!(target: "romdl.http", error = %e, "failed to encode progress view");
            None
        }
    }
}

fn close(code: u16, reason: &str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: reason.into(),
    }))
}
