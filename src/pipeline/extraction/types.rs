use serde::{Deserialize, Serialize};

use super::ExtractionError;
use crate::models::{MediaType, Row};

/// What a format-specific extractor produces for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum ExtractedContent {
    /// Unstructured source (PDF, plain text).
    Text(String),
    /// Already-tabular source (CSV, spreadsheet). Each row is keyed by the
    /// source header; key order follows the header.
    Records(Vec<Row>),
}

impl ExtractedContent {
    /// Text handed to the structuring engine. Records are serialized as one
    /// compact JSON object per line.
    pub fn to_prompt_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Records(rows) => rows
                .iter()
                .map(|row| serde_json::Value::Object(row.clone()).to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Records(rows) => rows.is_empty(),
        }
    }
}

/// Raw bytes → extracted content for one declared media type.
pub trait ContentExtractor {
    fn extract(&self, bytes: &[u8], media_type: MediaType) -> Result<ExtractedContent, ExtractionError>;
}

/// Header names that occur more than once, each listed once in first-seen
/// order. Rows keep only the last cell under a repeated name.
pub fn duplicate_headers(headers: &[String]) -> Vec<&str> {
    let mut duplicates: Vec<&str> = Vec::new();
    for (idx, header) in headers.iter().enumerate() {
        if headers[..idx].contains(header) && !duplicates.contains(&header.as_str()) {
            duplicates.push(header);
        }
    }
    duplicates
}
