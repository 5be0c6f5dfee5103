//! Tabular parser — raw CSV text to column names plus string rows.
//!
//! The first record is always consumed as the header. Row widths are strict:
//! a ragged record is a `Parse` error, not a silent truncation, and that
//! error propagates uncaught to the caller of the whole pipeline.

use crate::error::DataError;

/// A parsed dataset: ordered column names and raw text rows.
///
/// Invariant: every row has exactly `columns.len()` values (enforced by the
/// strict CSV reader).
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse comma-delimited text with a header line.
pub fn parse(text: &str) -> Result<ParsedTable, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DataError::Parse(e.to_string()))?
        .iter()
        .map(String::from)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| DataError::Parse(e.to_string()))?;
        rows.push(record.iter().map(String::from).collect());
    }

    Ok(ParsedTable { columns, rows })
}
