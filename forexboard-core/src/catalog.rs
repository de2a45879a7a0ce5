//! Symbol catalogue: which symbols the backtest service has data for, and at
//! which timeframes.
//!
//! The service answers `GET /get_symbols/` with a JSON object of the form
//! `{"EURUSD": {"DAY": "EURUSDDAY.csv", "1H": "EURUSD1H.csv"}, ...}`. Only the
//! keys matter to the client; the values are kept as opaque metadata. Key order
//! is significant ("first symbol", "first timeframe") and follows the order of
//! the JSON object as received.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Raised when the catalogue payload is not an object of objects.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalogue entry for '{symbol}' is not an object")]
    NotAnObject { symbol: String },
}

/// One timeframe available for a symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeframeEntry {
    pub name: String,
    /// Opaque per-timeframe metadata (the service sends the source file name).
    pub metadata: Value,
}

/// One symbol with its non-empty, ordered list of timeframes.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    pub symbol: String,
    pub timeframes: Vec<TimeframeEntry>,
}

/// Ordered symbol → timeframe catalogue. Immutable once built.
///
/// Every symbol has at least one timeframe; symbols advertised with an empty
/// timeframe object are dropped while parsing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct SymbolCatalog {
    entries: Vec<SymbolEntry>,
}

impl SymbolCatalog {
    /// Build a catalogue from `(symbol, [timeframe])` pairs, preserving order.
    ///
    /// Symbols with no timeframes are skipped.
    pub fn from_pairs<S, T, I>(pairs: I) -> Self
    where
        S: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = (S, Vec<T>)>,
    {
        let entries = pairs
            .into_iter()
            .filter(|(_, tfs)| !tfs.is_empty())
            .map(|(symbol, tfs)| SymbolEntry {
                symbol: symbol.into(),
                timeframes: tfs
                    .into_iter()
                    .map(|name| TimeframeEntry {
                        name: name.into(),
                        metadata: Value::Null,
                    })
                    .collect(),
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[SymbolEntry] {
        &self.entries
    }

    /// Symbols in catalogue order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.symbol.as_str())
    }

    pub fn first_symbol(&self) -> Option<&str> {
        self.entries.first().map(|e| e.symbol.as_str())
    }

    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.entry(symbol).is_some()
    }

    pub fn entry(&self, symbol: &str) -> Option<&SymbolEntry> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    /// Position of `symbol` in catalogue order.
    pub fn symbol_index(&self, symbol: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.symbol == symbol)
    }

    /// Timeframes of `symbol` in catalogue order (empty if unknown).
    pub fn timeframes<'a>(&'a self, symbol: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.entry(symbol)
            .into_iter()
            .flat_map(|e| e.timeframes.iter().map(|t| t.name.as_str()))
    }

    pub fn first_timeframe(&self, symbol: &str) -> Option<&str> {
        self.entry(symbol)
            .and_then(|e| e.timeframes.first())
            .map(|t| t.name.as_str())
    }

    pub fn has_timeframe(&self, symbol: &str, timeframe: &str) -> bool {
        self.timeframes(symbol).any(|tf| tf == timeframe)
    }

    /// Metadata attached to a `(symbol, timeframe)` pair.
    pub fn metadata(&self, symbol: &str, timeframe: &str) -> Option<&Value> {
        self.entry(symbol)?
            .timeframes
            .iter()
            .find(|t| t.name == timeframe)
            .map(|t| &t.metadata)
    }

    /// Pick the symbol a fresh selection starts on: `preferred` if listed,
    /// otherwise the first symbol.
    pub fn default_symbol(&self, preferred: &str) -> Option<&str> {
        self.entry(preferred)
            .map(|e| e.symbol.as_str())
            .or_else(|| self.first_symbol())
    }

    /// Pick the timeframe for `symbol`: `preferred` if listed under it,
    /// otherwise its first timeframe.
    pub fn default_timeframe(&self, symbol: &str, preferred: &str) -> Option<&str> {
        let entry = self.entry(symbol)?;
        entry
            .timeframes
            .iter()
            .find(|t| t.name == preferred)
            .or_else(|| entry.timeframes.first())
            .map(|t| t.name.as_str())
    }
}

impl TryFrom<Map<String, Value>> for SymbolCatalog {
    type Error = CatalogError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut entries = Vec::with_capacity(map.len());
        for (symbol, value) in map {
            let Value::Object(timeframes) = value else {
                return Err(CatalogError::NotAnObject { symbol });
            };
            if timeframes.is_empty() {
                log::warn!("catalogue lists '{symbol}' without any timeframe, skipping it");
                continue;
            }
            entries.push(SymbolEntry {
                symbol,
                timeframes: timeframes
                    .into_iter()
                    .map(|(name, metadata)| TimeframeEntry { name, metadata })
                    .collect(),
            });
        }
        Ok(Self { entries })
    }
}
