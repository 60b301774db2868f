pub mod types;
pub mod pdf;
pub mod text;
pub mod delimited;
pub mod spreadsheet;
pub mod orchestrator;
#[cfg(test)]
pub(crate) mod fixtures;

pub use types::*;
pub use orchestrator::*;

use thiserror::Error;

/// Content extraction failures. These are fatal for the document and are
/// reported to the caller; the structuring layers never produce them.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unparsable document: {0}")]
    UnparsableDocument(String),

    #[error("Text encoding error: {0}")]
    EncodingError(String),
}
