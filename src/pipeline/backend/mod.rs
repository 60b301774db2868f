pub mod fallback;
pub mod orchestrator;
pub mod remote;

pub use fallback::*;
pub use orchestrator::*;
pub use remote::*;

use thiserror::Error;

/// Failures talking to the remote processing service. The orchestrator
/// turns every one of these into data; none reaches the pipeline caller.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Remote service unavailable at {url}: {reason}")]
    Unavailable { url: String, reason: String },

    #[error("Remote call failed: {0}")]
    CallFailed(String),

    #[error("Remote service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Remote call timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed remote response: {0}")]
    MalformedResponse(String),
}
