//! Integration tests for the full cache-and-materialize pipeline.

use seriescache_core::{Cell, DataError, DatasetCache, SeriesProvider, SharedCache, SourceRegistry};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

const FIXTURE_CSV: &str = "\
date,count,rate,label
2024-01-01,42,3.14,hello
2024-02-01,43,3.15,world
2024-03-01,44,3.16,again
";

/// Stub provider with a fixed body and a shared call counter.
struct CountingProvider {
    body: String,
    calls: Arc<AtomicUsize>,
}

impl CountingProvider {
    fn new(body: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                body: body.to_string(),
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl SeriesProvider for CountingProvider {
    fn name(&self) -> &str {
        "counting"
    }

    fn fetch(&self, _symbol: &str, _url: &str) -> Result<String, DataError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }
}

fn registry_with(symbol: &str) -> SourceRegistry {
    let mut sources = BTreeMap::new();
    sources.insert(
        symbol.to_string(),
        format!("https://example.com/{symbol}.csv"),
    );
    SourceRegistry::new(sources)
}

fn temp_db_path(tag: &str) -> PathBuf {
    let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!(
        "seriescache_{tag}_{}_{id}.db",
        std::process::id()
    ))
}

#[test]
fn first_row_drives_schema_and_cells_come_back_typed() {
    let (provider, _) = CountingProvider::new(FIXTURE_CSV);
    let mut cache =
        DatasetCache::open_in_memory(registry_with("CPI"), Box::new(provider)).unwrap();

    let ds = cache.get("CPI").unwrap();

    assert_eq!(ds.columns, vec!["date", "count", "rate", "label"]);
    assert_eq!(
        ds.rows[0],
        vec![
            Cell::Text("2024-01-01".into()),
            Cell::Integer(42),
            Cell::Real(3.14),
            Cell::Text("hello".into()),
        ]
    );
}

#[test]
fn round_trip_preserves_row_count_and_order() {
    let (provider, _) = CountingProvider::new(FIXTURE_CSV);
    let mut cache =
        DatasetCache::open_in_memory(registry_with("CPI"), Box::new(provider)).unwrap();

    let ds = cache.get("CPI").unwrap();

    assert_eq!(ds.row_count(), 3);
    let dates: Vec<String> = ds.rows.iter().map(|r| r[0].to_string()).collect();
    assert_eq!(dates, vec!["2024-01-01", "2024-02-01", "2024-03-01"]);
    let counts: Vec<String> = ds.rows.iter().map(|r| r[1].to_string()).collect();
    assert_eq!(counts, vec!["42", "43", "44"]);
}

#[test]
fn cache_hit_skips_the_network() {
    let (provider, calls) = CountingProvider::new(FIXTURE_CSV);
    let mut cache =
        DatasetCache::open_in_memory(registry_with("CPI"), Box::new(provider)).unwrap();

    let first = cache.get("CPI").unwrap();
    let second = cache.get("CPI").unwrap();
    let third = cache.get("CPI").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn unknown_symbol_performs_no_io() {
    let (provider, calls) = CountingProvider::new(FIXTURE_CSV);
    let mut cache =
        DatasetCache::open_in_memory(registry_with("CPI"), Box::new(provider)).unwrap();

    let result = cache.get("UNLISTED");

    assert!(matches!(
        result,
        Err(DataError::UnknownSymbol { symbol }) if symbol == "UNLISTED"
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(cache.status().unwrap().is_empty());
}

#[test]
fn empty_dataset_fails_and_leaves_no_table_behind() {
    let (provider, calls) = CountingProvider::new("date,count,rate,label\n");
    let mut cache =
        DatasetCache::open_in_memory(registry_with("CPI"), Box::new(provider)).unwrap();

    let result = cache.get("CPI");
    assert!(matches!(result, Err(DataError::EmptyDataset)));
    assert!(cache.status().unwrap().is_empty());

    // No table means no false cache hit: the next call runs the pipeline again.
    let result = cache.get("CPI");
    assert!(matches!(result, Err(DataError::EmptyDataset)));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn concurrent_gets_for_one_symbol_fetch_once() {
    let (provider, calls) = CountingProvider::new(FIXTURE_CSV);
    let cache =
        DatasetCache::open_in_memory(registry_with("CPI"), Box::new(provider)).unwrap();
    let shared = SharedCache::new(cache);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = shared.clone();
            std::thread::spawn(move || shared.get("CPI").unwrap())
        })
        .collect();

    for handle in handles {
        let ds = handle.join().unwrap();
        assert_eq!(ds.row_count(), 3);
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let status = shared.status().unwrap();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].table, "CPI");
    assert_eq!(status[0].row_count, 3);
}

#[test]
fn persisted_table_survives_reopening_the_store() {
    let db_path = temp_db_path("reopen");
    let _ = std::fs::remove_file(&db_path);

    {
        let (provider, calls) = CountingProvider::new(FIXTURE_CSV);
        let mut cache =
            DatasetCache::open(&db_path, registry_with("CPI"), Box::new(provider)).unwrap();
        cache.get("CPI").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    // Fresh process: new cache, new provider. The table is already on disk.
    let (provider, calls) = CountingProvider::new(FIXTURE_CSV);
    let mut cache =
        DatasetCache::open(&db_path, registry_with("CPI"), Box::new(provider)).unwrap();
    let ds = cache.get("CPI").unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(ds.row_count(), 3);

    let _ = std::fs::remove_file(&db_path);
}

#[test]
fn failed_fetch_surfaces_and_leaves_cache_absent() {
    struct FailingProvider;

    impl SeriesProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, symbol: &str, url: &str) -> Result<String, DataError> {
            Err(DataError::Fetch {
                url: url.to_string(),
                reason: format!("HTTP 503 for {symbol}"),
            })
        }
    }

    let mut cache =
        DatasetCache::open_in_memory(registry_with("CPI"), Box::new(FailingProvider)).unwrap();

    let result = cache.get("CPI");
    assert!(matches!(result, Err(DataError::Fetch { .. })));
    assert!(cache.status().unwrap().is_empty());
}
