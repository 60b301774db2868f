use std::collections::HashSet;
use std::time::Instant;

use uuid::Uuid;

use crate::models::{ProcessingOutcome, StructuredResult};
use crate::pipeline::structuring::{clamp_accuracy, Structured};

/// Final stage of a run: normalizes whatever path produced the table and
/// stamps the wall-clock duration measured from [`ResultAssembler::start`].
#[derive(Debug, Clone, Copy)]
pub struct ResultAssembler {
    started: Instant,
}

impl ResultAssembler {
    /// Start timing a pipeline invocation.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn assemble(&self, document_id: Uuid, structured: Structured) -> ProcessingOutcome {
        let result = normalize_result(structured.result);
        let processing_time_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            document_id = %document_id,
            source = %structured.source,
            columns = result.column_count(),
            rows = result.row_count(),
            accuracy = result.accuracy,
            elapsed_ms = processing_time_ms,
            "Result assembled"
        );

        ProcessingOutcome {
            document_id,
            result,
            processing_time_ms,
            source: structured.source,
        }
    }
}

/// Enforce the table invariants:
/// - `columns` unique, first occurrence wins
/// - every row key present in `columns` (unknown keys appended in first-seen order)
/// - `accuracy` within `[0, 100]`
///
/// Row order and row contents are never changed.
pub fn normalize_result(result: StructuredResult) -> StructuredResult {
    let StructuredResult {
        columns,
        rows,
        accuracy,
    } = result;

    let mut seen: HashSet<String> = HashSet::with_capacity(columns.len());
    let mut normalized: Vec<String> = Vec::with_capacity(columns.len());

    for column in columns {
        if seen.insert(column.clone()) {
            normalized.push(column);
        }
    }

    let declared = normalized.len();
    for row in &rows {
        for key in row.keys() {
            if seen.insert(key.clone()) {
                normalized.push(key.clone());
            }
        }
    }
    if normalized.len() > declared {
        tracing::debug!(
            added = normalized.len() - declared,
            "Row keys missing from columns were appended"
        );
    }

    StructuredResult::new(normalized, rows, clamp_accuracy(accuracy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ResultSource, Row};
    use serde_json::json;

    fn row(pairs: &[(&str, serde_json::Value)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicate_columns_keep_first_seen_order() {
        let result = normalize_result(StructuredResult::new(
            cols(&["B", "A", "B", "C", "A"]),
            vec![],
            90.0,
        ));
        assert_eq!(result.columns, ["B", "A", "C"]);
    }

    #[test]
    fn undeclared_row_keys_are_appended() {
        let result = normalize_result(StructuredResult::new(
            cols(&["A"]),
            vec![
                row(&[("A", json!(1)), ("Z", json!(2))]),
                row(&[("Y", json!(3)), ("Z", json!(4))]),
            ],
            90.0,
        ));
        assert_eq!(result.columns, ["A", "Z", "Y"]);
        for r in &result.rows {
            assert!(r.keys().all(|k| result.columns.contains(k)));
        }
    }

    #[test]
    fn row_order_preserved() {
        let rows = vec![
            row(&[("n", json!(3))]),
            row(&[("n", json!(1))]),
            row(&[("n", json!(2))]),
        ];
        let result = normalize_result(StructuredResult::new(cols(&["n"]), rows.clone(), 50.0));
        assert_eq!(result.rows, rows);
    }

    #[test]
    fn accuracy_clamped() {
        let high = normalize_result(StructuredResult::new(cols(&["a"]), vec![], 250.0));
        assert_eq!(high.accuracy, 100.0);
        let nan = normalize_result(StructuredResult::new(cols(&["a"]), vec![], f64::NAN));
        assert_eq!(nan.accuracy, 0.0);
    }

    #[test]
    fn conforming_result_unchanged() {
        let input = StructuredResult::new(
            cols(&["Status", "Error Details"]),
            vec![row(&[("Status", json!("x")), ("Error Details", json!("y"))])],
            0.0,
        );
        assert_eq!(normalize_result(input.clone()), input);
    }

    #[test]
    fn assemble_carries_source_and_timing() {
        let assembler = ResultAssembler::start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let id = Uuid::new_v4();
        let outcome = assembler.assemble(
            id,
            Structured {
                result: StructuredResult::new(cols(&["a", "a"]), vec![], 80.0),
                source: ResultSource::HeuristicFallback,
            },
        );
        assert_eq!(outcome.document_id, id);
        assert_eq!(outcome.source, ResultSource::HeuristicFallback);
        assert_eq!(outcome.result.columns, ["a"]);
        assert!(outcome.processing_time_ms >= 5);
    }
}
