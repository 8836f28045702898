//! HTTP error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use faro_core::RegistryError;

/// Errors a route handler can return, each mapped to a status code.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request or subscription (400).
    Validation(String),
    /// Backing store unreachable (503).
    Unavailable(String),
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::Validation { reason } => Self::Validation(reason),
            RegistryError::Unavailable { reason } => Self::Unavailable(reason),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(reason) => (StatusCode::BAD_REQUEST, reason),
            Self::Unavailable(reason) => (StatusCode::SERVICE_UNAVAILABLE, reason),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
