use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::enums::ResultSource;

/// One table row: column name → cell value. Keys are a subset of the
/// owning result's `columns`.
pub type Row = serde_json::Map<String, Value>;

/// Canonical table produced by one processing run.
///
/// `columns` is unique and defines display/export order; `rows` keep
/// extraction order. `accuracy` is in `[0, 100]` and is a declared
/// approximation, never a measured metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResult {
    pub columns: Vec<String>,
    #[serde(rename = "data")]
    pub rows: Vec<Row>,
    pub accuracy: f64,
}

impl StructuredResult {
    pub fn new(columns: Vec<String>, rows: Vec<Row>, accuracy: f64) -> Self {
        Self {
            columns,
            rows,
            accuracy,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell text for export and display. Missing cells and nulls are empty.
    pub fn cell_text(row: &Row, column: &str) -> String {
        row.get(column).map(value_text).unwrap_or_default()
    }
}

/// Render a JSON cell value as plain text.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Assembled output of a whole pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingOutcome {
    pub document_id: Uuid,
    pub result: StructuredResult,
    /// Wall-clock duration of the whole invocation.
    pub processing_time_ms: u64,
    pub source: ResultSource,
}
