use serde_json::Value;

use crate::models::{Row, StructuredResult};

/// Typed outcome of checking a model (or remote) payload against the
/// `{columns, data}` contract. Parse problems are data, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// Conforming table. `accuracy` is left at 0 for the caller to assign.
    Valid(StructuredResult),
    /// Why the payload was rejected.
    Invalid(String),
}

impl ParseOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }
}

/// Parse the AI completion text strictly as a JSON table.
///
/// A single surrounding Markdown code fence is tolerated; any other
/// surrounding prose makes the response invalid.
pub fn parse_structuring_response(response: &str) -> ParseOutcome {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return ParseOutcome::Invalid("empty response".into());
    }

    let body = strip_code_fence(trimmed);
    match serde_json::from_str::<Value>(body) {
        Ok(value) => validate_table(&value),
        Err(e) => ParseOutcome::Invalid(format!("invalid JSON: {e}")),
    }
}

/// Check a decoded JSON value for the `{columns: [string], data: [object]}` shape.
pub fn validate_table(value: &Value) -> ParseOutcome {
    let Some(object) = value.as_object() else {
        return ParseOutcome::Invalid("expected a JSON object".into());
    };

    let columns = match object.get("columns") {
        Some(Value::Array(items)) => {
            let mut columns = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                match item {
                    Value::String(name) => columns.push(name.clone()),
                    _ => return ParseOutcome::Invalid(format!("columns[{idx}] is not a string")),
                }
            }
            columns
        }
        Some(_) => return ParseOutcome::Invalid("\"columns\" is not an array".into()),
        None => return ParseOutcome::Invalid("missing \"columns\"".into()),
    };

    if columns.is_empty() {
        return ParseOutcome::Invalid("no columns".into());
    }

    let rows: Vec<Row> = match object.get("data") {
        Some(Value::Array(items)) => {
            let mut rows = Vec::with_capacity(items.len());
            for (idx, item) in items.iter().enumerate() {
                match item {
                    Value::Object(row) => rows.push(row.clone()),
                    _ => return ParseOutcome::Invalid(format!("data[{idx}] is not an object")),
                }
            }
            rows
        }
        Some(_) => return ParseOutcome::Invalid("\"data\" is not an array".into()),
        None => return ParseOutcome::Invalid("missing \"data\"".into()),
    };

    ParseOutcome::Valid(StructuredResult::new(columns, rows, 0.0))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return text;
    };
    // Drop the info string (e.g. `json`) on the opening fence line.
    match rest.find('\n') {
        Some(newline) => rest[newline + 1..].trim(),
        None => rest.trim(),
    }
}
