//! The caller-facing dataset handle.
//!
//! A `Dataset` is an owned snapshot of `SELECT * FROM <table>`: column names
//! plus typed cells. It is produced fresh on every `get`, even on a cache
//! hit — it is a view over the persisted table, not a stored entity.

use serde::Serialize;
use std::fmt;

/// One value as materialized by the backing store.
///
/// Tables created by this system declare only TEXT, INTEGER, and REAL
/// columns, so these four kinds (plus NULL) cover everything the store can
/// hand back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Integer(v) => write!(f, "{v}"),
            Cell::Real(v) => write!(f, "{v}"),
            Cell::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<rusqlite::types::Value> for Cell {
    fn from(value: rusqlite::types::Value) -> Self {
        use rusqlite::types::Value;
        match value {
            Value::Null => Cell::Null,
            Value::Integer(v) => Cell::Integer(v),
            Value::Real(v) => Cell::Real(v),
            Value::Text(v) => Cell::Text(v),
            // This system never writes blobs.
            Value::Blob(bytes) => Cell::Text(String::from_utf8_lossy(&bytes).into_owned()),
        }
    }
}

/// Query-backed tabular result returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Dataset {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
