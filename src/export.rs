//! Export of assembled tables: delimited text (CSV/TSV) and JSON.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;
use thiserror::Error;

use crate::models::{StructuredResult, Row};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV writer error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to finish export: {0}")]
    Finish(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Tsv => "text/tab-separated-values",
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

/// Serialize a result in the given format.
pub fn export(result: &StructuredResult, format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_delimited(result, b','),
        ExportFormat::Tsv => to_delimited(result, b'\t'),
        ExportFormat::Json => to_json(result),
    }
}

/// Header row of `columns`, then one record per row in row order.
///
/// Fields containing the delimiter, a quote or a line break are quoted and
/// embedded quotes are doubled. Missing cells are empty.
pub fn to_delimited(result: &StructuredResult, delimiter: u8) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(&result.columns)?;
    for row in &result.rows {
        writer.write_record(
            result
                .columns
                .iter()
                .map(|column| StructuredResult::cell_text(row, column)),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Finish(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::Finish(e.to_string()))
}

/// Pretty JSON array with one object per row. Every object carries every
/// column in column order; missing cells are `null`.
pub fn to_json(result: &StructuredResult) -> Result<String, ExportError> {
    let records: Vec<Value> = result
        .rows
        .iter()
        .map(|row| Value::Object(ordered_record(row, &result.columns)))
        .collect();
    Ok(serde_json::to_string_pretty(&records)?)
}

fn ordered_record(row: &Row, columns: &[String]) -> Row {
    columns
        .iter()
        .map(|column| (column.clone(), row.get(column).cloned().unwrap_or(Value::Null)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn table() -> StructuredResult {
        let rows = vec![
            [("Name", json!("Smith, John")), ("Note", json!("said \"hi\"")), ("Qty", json!(3))],
            [("Name", json!("Plain")), ("Note", json!("two\nlines")), ("Qty", json!(1.5))],
        ]
        .into_iter()
        .map(|pairs| pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect::<Row>())
        .collect();
        StructuredResult::new(
            vec!["Name".into(), "Note".into(), "Qty".into()],
            rows,
            90.0,
        )
    }

    #[test]
    fn csv_quotes_and_doubles() {
        let csv = to_delimited(&table(), b',').unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Name,Note,Qty"));
        assert_eq!(lines.next(), Some(r#""Smith, John","said ""hi""",3"#));
        assert!(csv.contains("Plain,\"two\nlines\",1.5"));
    }

    #[test]
    fn tsv_quotes_only_on_tab() {
        let mut row = Row::new();
        row.insert("A".into(), json!("x, y"));
        row.insert("B".into(), json!("tab\there"));
        let result = StructuredResult::new(vec!["A".into(), "B".into()], vec![row], 80.0);

        let tsv = to_delimited(&result, b'\t').unwrap();
        assert_eq!(tsv, "A\tB\nx, y\t\"tab\there\"\n");
    }

    #[test]
    fn missing_cells_are_empty() {
        let mut row = Row::new();
        row.insert("B".into(), json!("only b"));
        let result = StructuredResult::new(vec!["A".into(), "B".into(), "C".into()], vec![row], 75.0);
        let csv = to_delimited(&result, b',').unwrap();
        assert_eq!(csv, "A,B,C\n,only b,\n");
    }

    #[test]
    fn delimited_round_trip_preserves_cells() {
        let original = table();
        let csv = to_delimited(&original, b',').unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(csv.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, original.columns);

        let parsed: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(String::from).collect())
            .collect();
        assert_eq!(parsed.len(), original.row_count());
        for (record, row) in parsed.iter().zip(&original.rows) {
            let expected: Vec<String> = original
                .columns
                .iter()
                .map(|c| StructuredResult::cell_text(row, c))
                .collect();
            assert_eq!(record, &expected);
        }
    }

    #[test]
    fn json_follows_column_order() {
        let mut row = Row::new();
        row.insert("Z".into(), json!(1));
        row.insert("A".into(), json!("a"));
        let result = StructuredResult::new(vec!["A".into(), "M".into(), "Z".into()], vec![row], 90.0);

        let text = to_json(&result).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        let keys: Vec<&String> = parsed[0].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["A", "M", "Z"]);
        assert_eq!(parsed[0]["M"], Value::Null);
        assert_eq!(parsed[0]["Z"], 1);
    }

    #[test]
    fn empty_table_exports_header_only() {
        let result = StructuredResult::new(vec!["Line Number".into()], vec![], 75.0);
        assert_eq!(to_delimited(&result, b',').unwrap(), "Line Number\n");
        assert_eq!(to_json(&result).unwrap(), "[]");
    }

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("tsv".parse::<ExportFormat>().unwrap(), ExportFormat::Tsv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!("xml".parse::<ExportFormat>(), Err(ExportError::UnknownFormat(_))));
        assert_eq!(ExportFormat::Tsv.content_type(), "text/tab-separated-values");
    }

    #[test]
    fn export_dispatches() {
        let result = table();
        assert!(export(&result, ExportFormat::Tsv).unwrap().starts_with("Name\tNote\tQty\n"));
        assert!(export(&result, ExportFormat::Json).unwrap().starts_with('['));
    }
}
