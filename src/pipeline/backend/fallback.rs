use serde_json::json;

use crate::models::{Row, StructuredResult};
use crate::pipeline::structuring::ERROR_FALLBACK_ACCURACY;

pub const COLUMN_STATUS: &str = "Status";
pub const COLUMN_ERROR_DETAILS: &str = "Error Details";

/// Status cell text of the error-fallback row.
pub const FALLBACK_STATUS: &str = "Using Fallback (Backend Failed)";

/// Reason used when a chain ends without any strategy reporting one.
pub const DEFAULT_FALLBACK_REASON: &str = "Backend unavailable (Health check failed)";

/// Terminal result when no processing path produced a table: the failure
/// itself, reported as a one-row `{Status, Error Details}` table with
/// accuracy 0.
pub fn error_fallback(reason: &str) -> StructuredResult {
    let reason = if reason.trim().is_empty() {
        DEFAULT_FALLBACK_REASON
    } else {
        reason
    };

    let mut row = Row::new();
    row.insert(COLUMN_STATUS.into(), json!(FALLBACK_STATUS));
    row.insert(COLUMN_ERROR_DETAILS.into(), json!(reason));

    StructuredResult::new(
        vec![COLUMN_STATUS.to_string(), COLUMN_ERROR_DETAILS.to_string()],
        vec![row],
        ERROR_FALLBACK_ACCURACY,
    )
}
