pub mod types;
pub mod prompt;
pub mod parser;
pub mod heuristic;
pub mod confidence;
pub mod ollama;
pub mod orchestrator;

pub use types::*;
pub use prompt::*;
pub use parser::*;
pub use heuristic::*;
pub use confidence::*;
pub use ollama::*;
pub use orchestrator::*;

use thiserror::Error;

/// Failures of the AI completion capability. The engine converts every one
/// of these into the heuristic fallback; none reaches the pipeline caller.
#[derive(Error, Debug)]
pub enum StructuringError {
    #[error("AI structuring is disabled")]
    Disabled,

    #[error("AI service is not reachable at {0}")]
    Connection(String),

    #[error("AI service returned error (status {status}): {body}")]
    ServiceError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("AI request timed out after {0}s")]
    Timeout(u64),

    #[error("Empty AI response")]
    EmptyResponse,

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("AI response rejected: {0}")]
    InvalidResponse(String),
}
