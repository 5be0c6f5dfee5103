//! Dataset cache — the orchestrator that owns the connection and registry.
//!
//! One operation: `get(symbol)`. On a miss the pipeline runs fetch → parse →
//! infer schema → create table + insert rows (in one transaction) → select.
//! On a hit it goes straight to the select. Cache-hit status is re-derived
//! from the store's catalog on every call; nothing is kept in memory between
//! calls, so the SQLite file is the durable cache across process restarts.
//!
//! A failed miss rolls its transaction back, so the store never holds a
//! partially populated table and the next `get` re-attempts the full load.
//! There are no retries and no refresh: a cached table is served until the
//! database is invalidated by hand.

use crate::dataset::Dataset;
use crate::error::DataError;
use crate::parse;
use crate::provider::SeriesProvider;
use crate::registry::SourceRegistry;
use crate::schema;
use crate::store::{TableStatus, TableStore};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Owner of the connection handle, the registry, and the fetch provider.
///
/// `get` takes `&mut self`: one cache value processes one call at a time.
/// Wrap it in a [`SharedCache`] to queue callers from multiple threads.
pub struct DatasetCache {
    conn: Connection,
    registry: SourceRegistry,
    provider: Box<dyn SeriesProvider>,
}

impl DatasetCache {
    /// Open (or create) the backing database file.
    pub fn open(
        db_path: impl AsRef<Path>,
        registry: SourceRegistry,
        provider: Box<dyn SeriesProvider>,
    ) -> Result<Self, DataError> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn,
            registry,
            provider,
        })
    }

    /// In-memory store, nothing persists. Intended for tests.
    pub fn open_in_memory(
        registry: SourceRegistry,
        provider: Box<dyn SeriesProvider>,
    ) -> Result<Self, DataError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            registry,
            provider,
        })
    }

    /// The registry this cache resolves symbols against.
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Queryable table for a symbol, fetched from the source only on a miss.
    ///
    /// The registry membership check runs before anything else: an unknown
    /// symbol fails without touching the network or the store.
    pub fn get(&mut self, symbol: &str) -> Result<Dataset, DataError> {
        let url = self
            .registry
            .url(symbol)
            .ok_or_else(|| DataError::UnknownSymbol {
                symbol: symbol.to_string(),
            })?
            .to_string();

        // The table is named by the symbol's string form.
        let table = symbol;

        if !TableStore::new(&self.conn).exists(table)? {
            let raw = self.provider.fetch(symbol, &url)?;
            let parsed = parse::parse(&raw)?;
            let column_schema = schema::infer(&parsed.columns, &parsed.rows)?;

            let tx = self.conn.transaction()?;
            {
                let store = TableStore::new(&tx);
                store.create(table, &column_schema)?;
                store.insert_all(table, &parsed.columns, &parsed.rows)?;
            }
            tx.commit()?;
        }

        TableStore::new(&self.conn).select_all(table)
    }

    /// All cached tables and their row counts.
    pub fn status(&self) -> Result<Vec<TableStatus>, DataError> {
        TableStore::new(&self.conn).tables()
    }
}

/// Cloneable serialized façade over one [`DatasetCache`].
///
/// All `get` calls, regardless of symbol, queue onto the single connection
/// handle in arrival order. That makes "at most one concurrent fetch per
/// symbol" trivially true (in fact at most one concurrent fetch, period) at
/// the cost of cross-symbol parallelism. Callers block until their call
/// completes; a hung fetch blocks everyone behind it.
#[derive(Clone)]
pub struct SharedCache {
    inner: Arc<Mutex<DatasetCache>>,
}

impl SharedCache {
    pub fn new(cache: DatasetCache) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cache)),
        }
    }

    pub fn get(&self, symbol: &str) -> Result<Dataset, DataError> {
        self.inner.lock().unwrap().get(symbol)
    }

    pub fn status(&self) -> Result<Vec<TableStatus>, DataError> {
        self.inner.lock().unwrap().status()
    }
}
