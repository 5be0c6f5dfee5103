//! Source registry — the symbol → URL mapping.
//!
//! The registry is stored as a TOML config file with a single `[sources]`
//! table mapping series symbols to CSV endpoints. It is immutable after
//! construction: the cache owns one registry for its whole lifetime and
//! there is no dynamic reconfiguration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The complete symbol → source-URL registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRegistry {
    pub sources: BTreeMap<String, String>,
}

impl SourceRegistry {
    /// Build a registry from an explicit symbol → URL mapping.
    pub fn new(sources: BTreeMap<String, String>) -> Self {
        Self { sources }
    }

    /// Load a registry from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read sources file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a registry from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse sources TOML: {e}"))
    }

    /// Serialize the registry to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize sources: {e}"))
    }

    /// Source URL for a symbol, if registered.
    pub fn url(&self, symbol: &str) -> Option<&str> {
        self.sources.get(symbol).map(|s| s.as_str())
    }

    /// Whether a symbol is registered.
    pub fn contains(&self, symbol: &str) -> bool {
        self.sources.contains_key(symbol)
    }

    /// All registered symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        self.sources.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered symbols.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Built-in registry of common FRED series CSV endpoints.
    pub fn default_fred() -> Self {
        let mut sources = BTreeMap::new();

        for id in [
            "CPIAUCSL",     // Consumer Price Index, all urban consumers
            "UNRATE",       // Unemployment rate
            "FEDFUNDS",     // Effective federal funds rate
            "GDP",          // Gross domestic product
            "DGS10",        // 10-year treasury constant maturity
            "MORTGAGE30US", // 30-year fixed mortgage average
            "M2SL",         // M2 money stock
            "PAYEMS",       // Total nonfarm payrolls
        ] {
            sources.insert(
                id.to_string(),
                format!("https://fred.stlouisfed.org/graph/fredgraph.csv?id={id}"),
            );
        }

        Self { sources }
    }
}
