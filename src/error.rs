use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Failures surfaced by the external language backends and the components
/// that talk to them. Every variant is request-fatal; the API layer decides
/// how much of it the caller gets to see.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("language detection failed: {0}")]
    Detection(String),

    #[error("{backend} backend unreachable: {source}")]
    BackendUnreachable {
        backend: &'static str,
        source: reqwest::Error,
    },

    #[error("{backend} backend timed out")]
    BackendTimeout { backend: &'static str },

    #[error("no translation model installed")]
    NoModelInstalled,

    #[error("unsupported language pair: {from} -> {target}")]
    UnsupportedLanguage { from: String, target: String },

    #[error("{backend} backend error: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

impl ServiceError {
    /// Classify a reqwest transport error for one backend. Timeouts are kept
    /// distinct from connection failures so operators can tell a hung backend
    /// from a missing one.
    pub fn from_reqwest(backend: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::BackendTimeout { backend }
        } else if err.is_connect() {
            ServiceError::BackendUnreachable {
                backend,
                source: err,
            }
        } else {
            ServiceError::Backend {
                backend,
                message: err.to_string(),
            }
        }
    }
}

/// Error as seen by API callers: a status code and a short detail string,
/// rendered as the `{"detail": ...}` envelope.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}
