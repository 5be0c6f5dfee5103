//! SeriesCache Core — fetch-once, query-forever tables for economic series.
//!
//! The pipeline behind a single operation, `get(symbol)`:
//! - Source registry (symbol → CSV endpoint, TOML-configurable)
//! - Blocking fetch provider (HTTP, or a stub in tests)
//! - CSV parsing into a header plus raw text rows
//! - Storage schema inference from the first data row
//! - SQLite-backed table store (idempotent DDL, parameterized bulk insert)
//! - The orchestrating cache, serialized over one connection handle
//!
//! The SQLite file is the durable cache: a table created for a symbol is
//! served from disk on every later call, across process restarts, until the
//! database is invalidated by hand.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod parse;
pub mod provider;
pub mod registry;
pub mod schema;
pub mod store;

pub use cache::{DatasetCache, SharedCache};
pub use dataset::{Cell, Dataset};
pub use error::DataError;
pub use parse::ParsedTable;
pub use provider::{HttpProvider, SeriesProvider};
pub use registry::SourceRegistry;
pub use schema::{guess, ColumnSchema, ColumnType};
pub use store::{TableStatus, TableStore};
