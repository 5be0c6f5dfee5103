//! SeriesCache CLI — cached, queryable tables for economic series.
//!
//! Commands:
//! - `get` — return the table for a symbol, fetching from the source only on
//!   the first call; later calls are served from the SQLite cache
//! - `status` — report which series are cached and their row counts
//! - `sources` — list the configured symbol → URL registry

use anyhow::Result;
use clap::{Parser, Subcommand};
use seriescache_core::{Dataset, DatasetCache, HttpProvider, SourceRegistry};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "seriescache",
    about = "SeriesCache CLI — fetch-once, query-forever economic series"
)]
struct Cli {
    /// SQLite database file backing the cache.
    #[arg(long, default_value = "series.db")]
    db: PathBuf,

    /// TOML sources file ([sources] table of SYMBOL = URL pairs).
    /// Defaults to the built-in FRED registry.
    #[arg(long)]
    sources: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch-on-miss: print the cached table for a symbol.
    Get {
        /// Series symbol (e.g. CPIAUCSL, UNRATE).
        symbol: String,

        /// Print the dataset as JSON instead of an aligned table.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print at most this many rows (table output only).
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Report which series are cached and their row counts.
    Status {
        /// Print the status as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// List the configured symbol → URL sources.
    Sources,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            symbol,
            json,
            limit,
        } => run_get(&cli.db, cli.sources.as_deref(), &symbol, json, limit),
        Commands::Status { json } => run_status(&cli.db, cli.sources.as_deref(), json),
        Commands::Sources => run_sources(cli.sources.as_deref()),
    }
}

fn load_registry(path: Option<&Path>) -> Result<SourceRegistry> {
    match path {
        Some(p) => SourceRegistry::from_file(p).map_err(|e| anyhow::anyhow!(e)),
        None => Ok(SourceRegistry::default_fred()),
    }
}

fn open_cache(db: &Path, sources: Option<&Path>) -> Result<DatasetCache> {
    let registry = load_registry(sources)?;
    Ok(DatasetCache::open(
        db,
        registry,
        Box::new(HttpProvider::new()),
    )?)
}

fn run_get(
    db: &Path,
    sources: Option<&Path>,
    symbol: &str,
    json: bool,
    limit: Option<usize>,
) -> Result<()> {
    let mut cache = open_cache(db, sources)?;
    let dataset = cache.get(symbol)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dataset)?);
    } else {
        print_dataset(&dataset, limit);
    }

    Ok(())
}

fn run_status(db: &Path, sources: Option<&Path>, json: bool) -> Result<()> {
    let cache = open_cache(db, sources)?;
    let status = cache.status()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    if status.is_empty() {
        println!("Cache is empty: {}", db.display());
        return Ok(());
    }

    println!("Cache: {}", db.display());
    println!();
    println!("{:<16} {:>10}", "Table", "Rows");
    println!("{}", "-".repeat(27));
    for entry in &status {
        println!("{:<16} {:>10}", entry.table, entry.row_count);
    }

    Ok(())
}

fn run_sources(sources: Option<&Path>) -> Result<()> {
    let registry = load_registry(sources)?;

    println!("{} configured source(s):", registry.len());
    println!();
    for symbol in registry.symbols() {
        let url = registry.url(symbol).unwrap_or("");
        println!("{symbol:<16} {url}");
    }

    Ok(())
}

fn print_dataset(dataset: &Dataset, limit: Option<usize>) {
    let shown = limit.unwrap_or(dataset.row_count()).min(dataset.row_count());

    // Column widths: max of header and every shown value.
    let mut widths: Vec<usize> = dataset.columns.iter().map(|c| c.len()).collect();
    for row in dataset.rows.iter().take(shown) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.to_string().len());
        }
    }

    let header: Vec<String> = dataset
        .columns
        .iter()
        .zip(&widths)
        .map(|(name, &w)| format!("{name:<w$}"))
        .collect();
    let header_line = header.join("  ");
    println!("{header_line}");
    println!("{}", "-".repeat(header_line.len()));

    for row in dataset.rows.iter().take(shown) {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{:<w$}", cell.to_string()))
            .collect();
        println!("{}", line.join("  "));
    }

    if shown < dataset.row_count() {
        println!("... ({} of {} rows shown)", shown, dataset.row_count());
    } else {
        println!("({} rows)", dataset.row_count());
    }
}
