//! Handler error type.
//!
//! Framework rejections are wrapped so every failure leaves the server as a
//! JSON `{"error": "..."}` body with the rejection's own status code.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The requested download exists in neither lookup location.
    #[error("file `{0}` does not exist")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("missing required form field `{0}`")]
    MissingField(&'static str),

    #[error(transparent)]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    MultipartRejection(#[from] MultipartRejection),

    #[error(transparent)]
    Form(#[from] FormRejection),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::Multipart(e) => e.status(),
            AppError::MultipartRejection(e) => e.status(),
            AppError::Form(e) => e.status(),
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "internal error");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "client error");
        }

        let message = match &self {
            AppError::Io(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
