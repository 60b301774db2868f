use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum accepted upload size (50 MiB). Enforced by the upload boundary,
/// not re-checked by the pipeline.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_TEXT: &str = "text/plain";
pub const MIME_CSV: &str = "text/csv";
pub const MIME_XLS: &str = "application/vnd.ms-excel";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Declared media types the pipeline accepts, in display order.
pub const SUPPORTED_MIME_TYPES: &[&str] = &[MIME_PDF, MIME_TEXT, MIME_CSV, MIME_XLS, MIME_XLSX];

/// Supported content families. Both spreadsheet MIME types map to one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Pdf,
    PlainText,
    Csv,
    Spreadsheet,
}

impl MediaType {
    /// Resolve a declared MIME type. Parameters (`; charset=...`) and case are
    /// ignored; anything outside the allow-list is `None`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
        match essence.as_str() {
            MIME_PDF => Some(Self::Pdf),
            MIME_TEXT => Some(Self::PlainText),
            MIME_CSV => Some(Self::Csv),
            MIME_XLS | MIME_XLSX => Some(Self::Spreadsheet),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "text",
            Self::Csv => "csv",
            Self::Spreadsheet => "spreadsheet",
        }
    }

    /// Tabular sources arrive as row records rather than free text.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::Csv | Self::Spreadsheet)
    }
}

/// An uploaded file as handed over by the uploader: bytes plus declared
/// metadata. The pipeline reads it once and never mutates it.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub id: Uuid,
    pub filename: String,
    /// MIME type as declared by the client, verbatim.
    pub declared_type: String,
    pub content: Vec<u8>,
}

impl RawDocument {
    pub fn new(filename: impl Into<String>, declared_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            filename: filename.into(),
            declared_type: declared_type.into(),
            content,
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::from_mime(&self.declared_type)
    }
}
