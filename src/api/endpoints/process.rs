//! `POST /process`: multipart upload → local pipeline → table.

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{RawDocument, MAX_FILE_SIZE};
use crate::pipeline::backend::RemoteProcessResponse;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "file";

const FALLBACK_MIME: &str = "application/octet-stream";

struct Upload {
    filename: String,
    declared_type: String,
    content: Vec<u8>,
}

/// `POST /process`: run one uploaded document through the local pipeline.
pub async fn process(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<RemoteProcessResponse>, ApiError> {
    let upload = read_upload(&mut multipart).await?;

    if upload.content.len() as u64 > MAX_FILE_SIZE {
        tracing::warn!(
            filename = %upload.filename,
            size = upload.content.len(),
            "Rejecting oversized upload"
        );
        return Err(ApiError::PayloadTooLarge);
    }

    tracing::info!(
        filename = %upload.filename,
        declared_type = %upload.declared_type,
        size = upload.content.len(),
        "Processing upload"
    );

    let document = RawDocument::new(
        upload.filename.clone(),
        upload.declared_type.clone(),
        upload.content,
    );
    let (outcome, _) = ctx.processor.process_and_store(document).await?;
    let result = outcome.result;

    Ok(Json(RemoteProcessResponse {
        success: true,
        filename: Some(upload.filename),
        file_type: Some(upload.declared_type),
        row_count: result.row_count(),
        column_count: result.column_count(),
        accuracy: result.accuracy,
        processing_time: outcome.processing_time_ms as f64 / 1000.0,
        extracted_data: json!({
            "columns": result.columns,
            "data": result.rows,
        }),
        document_id: Some(outcome.document_id),
        source: Some(outcome.source),
    }))
}

/// Take the `file` field; other fields are ignored. A missing content
/// type is guessed from the file name.
async fn read_upload(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| "unknown".to_string());
        let declared_type = match field.content_type() {
            Some(ct) => ct.to_string(),
            None => mime_guess::from_path(&filename)
                .first_raw()
                .unwrap_or(FALLBACK_MIME)
                .to_string(),
        };
        let content = field.bytes().await?.to_vec();

        return Ok(Upload {
            filename,
            declared_type,
            content,
        });
    }
    Err(ApiError::MissingFile)
}
