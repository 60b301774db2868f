use super::ExtractionError;

/// Plain text is taken verbatim; it must be valid UTF-8.
pub fn extract_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::EncodingError(e.to_string()))
}
