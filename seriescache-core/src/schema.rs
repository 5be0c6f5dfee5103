//! Storage schema inference and DDL generation.
//!
//! Types are guessed per column from the *first* data row only. That is a
//! deliberate cheap heuristic, not a guarantee across all rows; SQLite's
//! column affinity absorbs most of the slack on write. The heuristic is
//! isolated behind `infer` so a full-column-scan strategy could replace it
//! without touching the store or cache layers.

use crate::error::DataError;
use chrono::NaiveDate;

/// Storage type tag for one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Real,
}

impl ColumnType {
    /// SQL type name used in DDL.
    pub fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Text => "TEXT",
            ColumnType::Integer => "INTEGER",
            ColumnType::Real => "REAL",
        }
    }
}

/// Ordered (column name, storage type) pairs for one table.
pub type ColumnSchema = Vec<(String, ColumnType)>;

/// Guess the storage type of a raw text token.
///
/// Rules in strict order, first match wins:
/// 1. ISO-8601 calendar date → TEXT (dates are stored as text)
/// 2. base-10 integer literal → INTEGER
/// 3. floating-point literal → REAL
/// 4. anything else → TEXT
///
/// The integer parse runs before the float parse, so a token parseable as
/// both (no fractional part) is INTEGER. Total: the default branch always
/// applies.
pub fn guess(token: &str) -> ColumnType {
    if NaiveDate::parse_from_str(token, "%Y-%m-%d").is_ok() {
        return ColumnType::Text;
    }
    if token.parse::<i64>().is_ok() {
        return ColumnType::Integer;
    }
    if token.parse::<f64>().is_ok() {
        return ColumnType::Real;
    }
    ColumnType::Text
}

/// Infer a column schema from the first data row.
///
/// Fails with `EmptyDataset` when there are no data rows to sample.
pub fn infer(columns: &[String], rows: &[Vec<String>]) -> Result<ColumnSchema, DataError> {
    let sample = rows.first().ok_or(DataError::EmptyDataset)?;
    Ok(columns
        .iter()
        .zip(sample)
        .map(|(name, value)| (name.clone(), guess(value)))
        .collect())
}

/// Render the idempotent DDL statement for a table.
///
/// All interpolated identifiers are validated first; values never appear in
/// DDL. The `IF NOT EXISTS` guard is the second line of defense behind the
/// cache's existence check.
pub fn create_statement(table: &str, schema: &ColumnSchema) -> Result<String, DataError> {
    let table = valid_identifier(table)?;
    let columns: Vec<String> = schema
        .iter()
        .map(|(name, ty)| Ok(format!("{} {}", valid_identifier(name)?, ty.sql_name())))
        .collect::<Result<_, DataError>>()?;
    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {table} ({})",
        columns.join(", ")
    ))
}

/// Validate an identifier before it is interpolated into SQL text.
///
/// Accepts `[A-Za-z_][A-Za-z0-9_]*` and nothing else. Symbols and CSV
/// headers come from outside this process, so anything fancier than a plain
/// identifier is rejected rather than quoted.
pub fn valid_identifier(s: &str) -> Result<&str, DataError> {
    let mut chars = s.chars();
    let ok = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if ok {
        Ok(s)
    } else {
        Err(DataError::InvalidIdentifier(s.to_string()))
    }
}
