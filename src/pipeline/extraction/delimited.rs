use serde_json::Value;

use super::types::duplicate_headers;
use super::ExtractionError;
use crate::models::Row;

/// Parse CSV bytes into row records keyed by the header row.
///
/// A row whose field count differs from the header is dropped and logged;
/// it never fails the batch. Only an unreadable header is fatal.
pub fn extract_csv_records(bytes: &[u8]) -> Result<Vec<Row>, ExtractionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ExtractionError::UnparsableDocument(format!("CSV header: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let duplicates = duplicate_headers(&headers);
    if !duplicates.is_empty() {
        tracing::warn!(?duplicates, "CSV header repeats column names, keeping last value per name");
    }

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        match record {
            Ok(record) => {
                let row: Row = headers
                    .iter()
                    .zip(record.iter())
                    .map(|(header, field)| (header.clone(), Value::String(field.to_string())))
                    .collect();
                rows.push(row);
            }
            Err(e) => {
                dropped += 1;
                let line = e.position().map(|p| p.line());
                tracing::debug!(?line, error = %e, "Dropping malformed CSV row");
            }
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, kept = rows.len(), "CSV rows dropped during extraction");
    }

    Ok(rows)
}
