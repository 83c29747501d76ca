//! Axum-specific error types and mappings.
//!
//! Maps `CoreError` onto HTTP status codes with a JSON body
//! `{"error": ..., "status": ...}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use romdl_core::{CatalogError, CoreError, RepositoryError};
use serde::Serialize;
use thiserror::Error;

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Bad request (missing or invalid input).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid API key.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded.
    #[error("Too many requests")]
    TooManyRequests,

    /// Catalog or transfer engine failure.
    #[error("Bad gateway: {0}")]
    BadGateway(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::BadGateway(msg)
            | Self::Internal(msg) => msg,
            Self::TooManyRequests => "rate limit exceeded".to_string(),
        };
        if status.is_server_error() {
            tracing::error!(target: "romdl.http", status = status.as_u16(), error = %message, "request failed");
        }

        let body = ErrorBody {
            error: message,
            status: status.as_u16(),
        };
        (status, axum::Json(body)).into_response()
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::BadRequest(msg),
            CoreError::NotFound(msg) => Self::NotFound(msg),
            CoreError::Auth(msg) => Self::Unauthorized(msg),
            CoreError::RateLimited => Self::TooManyRequests,
            CoreError::Upstream(msg) => Self::BadGateway(msg),
            CoreError::Internal(msg) => Self::Internal(msg),
        }
    }
}

impl From<RepositoryError> for HttpError {
    fn from(err: RepositoryError) -> Self {
        CoreError::from(err).into()
    }
}

impl From<CatalogError> for HttpError {
    fn from(err: CatalogError) -> Self {
        CoreError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_status_codes() {
        let cases = [
            (CoreError::Validation("x".into()), 400),
            (CoreError::Auth("x".into()), 401),
            (CoreError::NotFound("x".into()), 404),
            (CoreError::RateLimited, 429),
            (CoreError::Upstream("x".into()), 502),
            (CoreError::Internal("x".into()), 500),
        ];
        for (err, code) in cases {
            assert_eq!(HttpError::from(err).status().as_u16(), code);
        }
    }

    #[test]
    fn unknown_platform_is_not_found() {
        let err = HttpError::from(CatalogError::PlatformNotFound("snes".into()));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
