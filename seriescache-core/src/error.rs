//! Structured error types for the dataset pipeline.
//!
//! Every failure in a `get` call surfaces as one of these variants, unwrapped,
//! so callers can tell "bad symbol" from "network down" from "bad data".
//! Nothing is recovered or retried locally.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("unknown symbol: {symbol}")]
    UnknownSymbol { symbol: String },

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("malformed CSV: {0}")]
    Parse(String),

    #[error("dataset has no data rows, schema cannot be inferred")]
    EmptyDataset,

    #[error("invalid SQL identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),
}
