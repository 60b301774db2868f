use axum::Json;
use serde::Serialize;

use crate::models::SUPPORTED_MIME_TYPES;

/// Extraction paths the service can take, in pipeline order.
pub const PROCESSING_METHODS: &[&str] = &[
    "pdf_text",
    "plain_text",
    "csv_parser",
    "spreadsheet_parser",
    "ai_structuring",
    "heuristic_fallback",
];

#[derive(Serialize)]
pub struct FormatsResponse {
    pub supported_formats: &'static [&'static str],
    pub max_file_size: &'static str,
    pub processing_methods: &'static [&'static str],
}

/// `GET /formats`
pub async fn list() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        supported_formats: SUPPORTED_MIME_TYPES,
        max_file_size: "50MB",
        processing_methods: PROCESSING_METHODS,
    })
}
