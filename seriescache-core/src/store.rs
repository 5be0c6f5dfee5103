//! Table store — the four statement shapes against the backing SQLite file.
//!
//! Catalog existence check, idempotent `CREATE TABLE IF NOT EXISTS`, bulk
//! insert through one prepared parameterized statement, and `SELECT *`
//! materialization. Identifiers are validated before interpolation; values
//! only ever travel through parameter binding. No type coercion happens
//! here — values are bound as text and SQLite's column affinity coerces
//! them into the declared type on write.

use crate::dataset::{Cell, Dataset};
use crate::error::DataError;
use crate::schema::{self, ColumnSchema};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension};
use serde::Serialize;

/// One cached table and its row count, for status reporting.
#[derive(Debug, Clone, Serialize)]
pub struct TableStatus {
    pub table: String,
    pub row_count: usize,
}

/// Statement-level access to the backing store.
///
/// Borrows the connection (or an open transaction, which derefs to one);
/// ownership stays with the cache.
pub struct TableStore<'a> {
    conn: &'a Connection,
}

impl<'a> TableStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Whether a table of this exact name exists in the catalog.
    pub fn exists(&self, table: &str) -> Result<bool, DataError> {
        let found: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [table],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Create the table for a schema. Idempotent.
    pub fn create(&self, table: &str, schema: &ColumnSchema) -> Result<(), DataError> {
        let ddl = schema::create_statement(table, schema)?;
        self.conn.execute(&ddl, [])?;
        Ok(())
    }

    /// Bulk-insert raw text rows, one prepared statement executed per row.
    pub fn insert_all(
        &self,
        table: &str,
        columns: &[String],
        rows: &[Vec<String>],
    ) -> Result<(), DataError> {
        let table = schema::valid_identifier(table)?;
        let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!("INSERT INTO {table} VALUES ({})", placeholders.join(", "));

        let mut stmt = self.conn.prepare(&sql)?;
        for row in rows {
            stmt.execute(params_from_iter(row.iter().map(|v| v.as_str())))?;
        }
        Ok(())
    }

    /// Materialize `SELECT * FROM <table>` into an owned dataset.
    pub fn select_all(&self, table: &str) -> Result<Dataset, DataError> {
        let table = schema::valid_identifier(table)?;
        let mut stmt = self.conn.prepare(&format!("SELECT * FROM {table}"))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();
        let width = columns.len();

        let mut out = Vec::new();
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for i in 0..width {
                cells.push(Cell::from(row.get::<_, Value>(i)?));
            }
            out.push(cells);
        }

        Ok(Dataset { columns, rows: out })
    }

    /// All user tables in the store with their row counts, sorted by name.
    pub fn tables(&self) -> Result<Vec<TableStatus>, DataError> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<_, _>>()?;

        let mut out = Vec::with_capacity(names.len());
        for name in names {
            let ident = schema::valid_identifier(&name)?;
            let row_count: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {ident}"), [], |row| {
                        row.get(0)
                    })?;
            out.push(TableStatus {
                table: name,
                row_count: row_count as usize,
            });
        }
        Ok(out)
    }
}
