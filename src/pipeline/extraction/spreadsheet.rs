use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use serde_json::Value;

use super::types::duplicate_headers;
use super::ExtractionError;
use crate::models::Row;

/// Read the first sheet of an XLS/XLSX/ODS workbook into row records,
/// using the first row as headers.
pub fn extract_spreadsheet_records(bytes: &[u8]) -> Result<Vec<Row>, ExtractionError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|e| ExtractionError::UnparsableDocument(format!("Spreadsheet: {e}")))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => {
            range.map_err(|e| ExtractionError::UnparsableDocument(format!("First sheet: {e}")))?
        }
        None => {
            tracing::debug!("Workbook has no sheets");
            return Ok(Vec::new());
        }
    };

    Ok(records_from_range(&range))
}

/// Convert a sheet range to records. Empty cells are omitted from a row and
/// fully empty rows are skipped. Blank headers become `Column N`.
pub fn records_from_range(range: &Range<Data>) -> Vec<Row> {
    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .enumerate()
            .map(|(idx, cell)| {
                let name = cell_to_string(cell);
                if name.trim().is_empty() {
                    format!("Column {}", idx + 1)
                } else {
                    name
                }
            })
            .collect(),
        None => return Vec::new(),
    };

    let duplicates = duplicate_headers(&headers);
    if !duplicates.is_empty() {
        tracing::warn!(?duplicates, "Sheet header repeats column names, keeping last value per name");
    }

    rows.filter_map(|cells| {
        let row: Row = headers
            .iter()
            .zip(cells.iter())
            .filter_map(|(header, cell)| cell_to_value(cell).map(|v| (header.clone(), v)))
            .collect();
        (!row.is_empty()).then_some(row)
    })
    .collect()
}

fn cell_to_value(cell: &Data) -> Option<Value> {
    match cell {
        Data::Empty => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Float(f) => Some(serde_json::json!(f)),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        other => Some(Value::String(cell_to_string(other))),
    }
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("#ERR:{e:?}"),
        Data::DateTime(dt) => dt.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}
