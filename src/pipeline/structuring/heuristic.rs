use serde_json::json;

use super::confidence::HEURISTIC_ACCURACY;
use crate::models::{Row, StructuredResult};

/// Lines considered by the heuristic; later lines are ignored.
pub const HEURISTIC_MAX_LINES: usize = 100;

pub const COLUMN_LINE_NUMBER: &str = "Line Number";
pub const COLUMN_CONTENT: &str = "Content";
pub const COLUMN_WORD_COUNT: &str = "Word Count";

/// Deterministic line-per-row table used whenever AI structuring is
/// unavailable or returns unusable output.
///
/// Blank lines are skipped; only the first [`HEURISTIC_MAX_LINES`] non-blank
/// lines become rows. Line numbers count retained lines, starting at 1.
pub fn heuristic_fallback(text: &str) -> StructuredResult {
    let rows: Vec<Row> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(HEURISTIC_MAX_LINES)
        .enumerate()
        .map(|(idx, line)| {
            let content = line.trim();
            let mut row = Row::new();
            row.insert(COLUMN_LINE_NUMBER.into(), json!(idx + 1));
            row.insert(COLUMN_CONTENT.into(), json!(content));
            row.insert(
                COLUMN_WORD_COUNT.into(),
                json!(content.split_whitespace().count()),
            );
            row
        })
        .collect();

    StructuredResult::new(
        vec![
            COLUMN_LINE_NUMBER.to_string(),
            COLUMN_CONTENT.to_string(),
            COLUMN_WORD_COUNT.to_string(),
        ],
        rows,
        HEURISTIC_ACCURACY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_non_blank_line() {
        let result = heuristic_fallback("Invoice 42\n\n   \nTotal due: 120 EUR\n");
        assert_eq!(result.columns, ["Line Number", "Content", "Word Count"]);
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.rows[0]["Line Number"], 1);
        assert_eq!(result.rows[0]["Content"], "Invoice 42");
        assert_eq!(result.rows[0]["Word Count"], 2);
        assert_eq!(result.rows[1]["Line Number"], 2);
        assert_eq!(result.rows[1]["Word Count"], 4);
        assert_eq!(result.accuracy, 75.0);
    }

    #[test]
    fn content_is_trimmed() {
        let result = heuristic_fallback("   padded   line \t\n");
        assert_eq!(result.rows[0]["Content"], "padded   line");
        assert_eq!(result.rows[0]["Word Count"], 2);
    }

    #[test]
    fn caps_at_first_hundred_lines() {
        let text: String = (1..=250).map(|n| format!("line {n}\n\n")).collect();
        let result = heuristic_fallback(&text);
        assert_eq!(result.row_count(), HEURISTIC_MAX_LINES);
        assert_eq!(result.rows[99]["Content"], "line 100");
        assert_eq!(result.rows[99]["Line Number"], 100);
    }

    #[test]
    fn row_count_matches_non_blank_lines_under_cap() {
        let text = "a\n\nb c\n \nd\n";
        let expected = text.lines().filter(|l| !l.trim().is_empty()).count();
        assert_eq!(heuristic_fallback(text).row_count(), expected);
    }

    #[test]
    fn empty_text_gives_empty_table_with_columns() {
        let result = heuristic_fallback("");
        assert_eq!(result.row_count(), 0);
        assert_eq!(result.column_count(), 3);
    }

    #[test]
    fn deterministic() {
        let text = "alpha beta\ngamma\n";
        assert_eq!(heuristic_fallback(text), heuristic_fallback(text));
    }

    #[test]
    fn crlf_lines_are_split() {
        let result = heuristic_fallback("one\r\ntwo words\r\n");
        assert_eq!(result.row_count(), 2);
        assert_eq!(result.rows[1]["Content"], "two words");
    }
}
