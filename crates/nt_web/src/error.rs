use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nt_core::{Error, ErrorKind};
use serde_json::json;

pub const FETCH_FAILED: &str = "Failed to fetch news";
pub const GENERATION_FAILED: &str = "Failed to generate neutral summary";
pub const INVALID_JSON: &str = "Invalid JSON in request body";
pub const MISSING_TEXT: &str = "Missing article text in request body";

/// Error answered as `{"error": message}` with `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    /// Mapping for the headline endpoint: provider statuses are mirrored.
    pub fn headlines(err: Error) -> Self {
        let status = match err.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Upstream => err
                .upstream_status()
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ErrorKind::Configuration | ErrorKind::Network => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.message_or(FETCH_FAILED))
    }

    /// Mapping for the rewrite endpoint: every generation failure is a 500
    /// carrying the failure's own message when it has one.
    pub fn rewrite(err: Error) -> Self {
        let status = match err.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, err.detail_or(GENERATION_FAILED))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
