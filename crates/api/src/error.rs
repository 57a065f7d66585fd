//! HTTP error responses.
//!
//! Every error renders as `{"error": <message>, "code": <CODE>}` with the
//! matching status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors returned by the HTTP routes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request body could not be understood.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The caller did not present the expected webhook secret.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Unauthorized(_) => "UNAUTHORIZED",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = match self {
            Self::BadRequest(msg) | Self::Unauthorized(msg) => msg,
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}
