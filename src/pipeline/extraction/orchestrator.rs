use super::delimited::extract_csv_records;
use super::pdf::extract_pdf_text;
use super::spreadsheet::extract_spreadsheet_records;
use super::text::extract_plain_text;
use super::types::{ContentExtractor, ExtractedContent};
use super::ExtractionError;
use crate::models::{MediaType, RawDocument};

/// Dispatches raw bytes to the format-specific extractor.
///
/// Pure with respect to its input: reads the bytes, performs no I/O and
/// no cleanup (the uploader owns the file lifecycle).
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl DocumentExtractor {
    /// Resolve the declared type and extract. Types outside the allow-list
    /// fail with `UnsupportedFormat` before any byte is inspected.
    pub fn extract_document(&self, document: &RawDocument) -> Result<ExtractedContent, ExtractionError> {
        let media_type = document
            .media_type()
            .ok_or_else(|| ExtractionError::UnsupportedFormat(document.declared_type.clone()))?;

        let _span = tracing::info_span!(
            "extract_content",
            document_id = %document.id,
            media_type = media_type.as_str(),
            size = document.size(),
        )
        .entered();

        self.extract(&document.content, media_type)
    }
}

impl ContentExtractor for DocumentExtractor {
    fn extract(&self, bytes: &[u8], media_type: MediaType) -> Result<ExtractedContent, ExtractionError> {
        let content = match media_type {
            MediaType::Pdf => ExtractedContent::Text(extract_pdf_text(bytes)?),
            MediaType::PlainText => ExtractedContent::Text(extract_plain_text(bytes)?),
            MediaType::Csv => ExtractedContent::Records(extract_csv_records(bytes)?),
            MediaType::Spreadsheet => ExtractedContent::Records(extract_spreadsheet_records(bytes)?),
        };

        match &content {
            ExtractedContent::Text(text) => {
                tracing::info!(chars = text.chars().count(), "Content extraction complete")
            }
            ExtractedContent::Records(rows) => {
                tracing::info!(records = rows.len(), "Content extraction complete")
            }
        }

        Ok(content)
    }
}
