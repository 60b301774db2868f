//! API error types with structured JSON responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::pipeline::extraction::ExtractionError;
use crate::pipeline::processor::ProcessingError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("File too large")]
    PayloadTooLarge,
    #[error("No file uploaded")]
    MissingFile,
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),
    #[error("Document could not be read: {0}")]
    UnparsableDocument(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                "File too large. Maximum size is 50MB".to_string(),
            ),
            ApiError::MissingFile => (
                StatusCode::BAD_REQUEST,
                "NO_FILE",
                "No file uploaded".to_string(),
            ),
            ApiError::BadRequest(detail) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                detail.clone(),
            ),
            ApiError::UnsupportedFormat(declared) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FORMAT",
                format!("Unsupported file type: {declared}"),
            ),
            ApiError::UnparsableDocument(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPARSABLE_DOCUMENT",
                detail.clone(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<ProcessingError> for ApiError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::Extraction(ExtractionError::UnsupportedFormat(declared)) => {
                ApiError::UnsupportedFormat(declared)
            }
            ProcessingError::Extraction(e @ ExtractionError::UnparsableDocument(_))
            | ProcessingError::Extraction(e @ ExtractionError::EncodingError(_)) => {
                ApiError::UnparsableDocument(e.to_string())
            }
            ProcessingError::Database(e) => ApiError::Internal(e.to_string()),
            ProcessingError::Task(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(err.body_text())
        }
    }
}
