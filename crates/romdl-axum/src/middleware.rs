//! API key authentication and rate limiting for `/api/*`.

use std::borrow::Cow;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::HttpError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-api-key";
pub const API_KEY_QUERY: &str = "api_key";

/// Key supplied via `X-Api-Key`, `Authorization: Bearer`, or `?api_key=`.
pub fn supplied_key<'a>(headers: &'a HeaderMap, query: Option<&'a str>) -> Option<Cow<'a, str>> {
    let header_key = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    header_key
        .or(bearer)
        .map(|k| Cow::Borrowed(k.trim()))
        .or_else(|| query.and_then(query_key))
}

/// Form-decoded `api_key` query value.
fn query_key(query: &str) -> Option<Cow<'_, str>> {
    let raw = query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == API_KEY_QUERY).then_some(v)
    })?;
    let decoded = if raw.contains('+') {
        Cow::Owned(urlencoding::decode(&raw.replace('+', " ")).ok()?.into_owned())
    } else {
        urlencoding::decode(raw).ok()?
    };
    Some(match decoded {
        Cow::Borrowed(s) => Cow::Borrowed(s.trim()),
        Cow::Owned(s) => Cow::Owned(s.trim().to_string()),
    })
}

/// Whether `supplied` satisfies the configured key. No key means open access.
pub fn key_accepted(expected: Option<&str>, supplied: Option<&str>) -> bool {
    expected.is_none_or(|expected| supplied == Some(expected))
}

/// Reject requests without the configured API key.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let expected = state.settings.api_key.as_deref();
    let accepted = key_accepted(
        expected,
        supplied_key(req.headers(), req.uri().query()).as_deref(),
    );
    if accepted {
        return Ok(next.run(req).await);
    }
    tracing::warn!(
        target: "romdl.http",
        path = %req.uri().path(),
        "unauthorized API request - missing or invalid key"
    );
    Err(HttpError::Unauthorized("invalid api key".into()))
}

/// Sliding-window admission keyed by client IP.
pub async fn rate_limit(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let client = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map_or_else(|| "unknown".to_string(), |ci| ci.0.ip().to_string());
    if state.rate_limiter.allow(&client) {
        Ok(next.run(req).await)
    } else {
        Err(HttpError::TooManyRequests)
    }
}
