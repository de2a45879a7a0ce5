//! Selection state: the chosen symbol, timeframe and page.
//!
//! Mutations only touch in-memory state; the fetcher notices the changed
//! [`FetchKey`] and decides whether a request is due.

use crate::catalog::SymbolCatalog;
use crate::fetch::FetchKey;

/// Current symbol/timeframe/page choice.
///
/// `page` is 1-based and never zero. Changing the symbol or the timeframe
/// always returns to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    symbol: Option<String>,
    timeframe: Option<String>,
    page: u32,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            symbol: None,
            timeframe: None,
            page: 1,
        }
    }
}

impl Selection {
    /// Initial selection for a freshly loaded catalogue.
    ///
    /// Starts on `preferred_symbol` / `preferred_timeframe` when the catalogue
    /// lists them, otherwise on the first symbol and its first timeframe. An
    /// empty catalogue yields an empty selection.
    pub fn from_catalog(
        catalog: &SymbolCatalog,
        preferred_symbol: &str,
        preferred_timeframe: &str,
    ) -> Self {
        let symbol = catalog.default_symbol(preferred_symbol);
        let timeframe =
            symbol.and_then(|s| catalog.default_timeframe(s, preferred_timeframe));
        Self {
            symbol: symbol.map(String::from),
            timeframe: timeframe.map(String::from),
            page: 1,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        self.symbol.as_deref()
    }

    pub fn timeframe(&self) -> Option<&str> {
        self.timeframe.as_deref()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Both symbol and timeframe are chosen and non-empty.
    pub fn is_complete(&self) -> bool {
        self.symbol().is_some_and(|s| !s.is_empty())
            && self.timeframe().is_some_and(|t| !t.is_empty())
    }

    /// Switch symbol. Keeps the current timeframe if the new symbol has it,
    /// otherwise falls back to the symbol's first timeframe (or none when the
    /// symbol is not in the catalogue). Resets to page 1.
    pub fn set_symbol(&mut self, catalog: &SymbolCatalog, symbol: &str) {
        let keep = self
            .timeframe
            .as_deref()
            .filter(|tf| catalog.has_timeframe(symbol, tf))
            .map(String::from);
        self.timeframe = keep.or_else(|| catalog.first_timeframe(symbol).map(String::from));
        self.symbol = Some(symbol.to_string());
        self.page = 1;
    }

    /// Switch timeframe directly and reset to page 1.
    pub fn set_timeframe(&mut self, timeframe: &str) {
        self.timeframe = Some(timeframe.to_string());
        self.page = 1;
    }

    /// Jump to `page` without checking it against the page count; that bound
    /// is enforced by the disabled pagination controls. Zero is read as 1.
    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    /// Step through symbols in catalogue order, wrapping around.
    ///
    /// Returns `false` when the catalogue is empty.
    pub fn cycle_symbol(&mut self, catalog: &SymbolCatalog, step: isize) -> bool {
        let len = catalog.len();
        if len == 0 {
            return false;
        }
        let current = self
            .symbol()
            .and_then(|s| catalog.symbol_index(s));
        let next = match current {
            Some(i) => wrap(i, step, len),
            None => 0,
        };
        let symbol = catalog.entries()[next].symbol.clone();
        self.set_symbol(catalog, &symbol);
        true
    }

    /// Step through the current symbol's timeframes, wrapping around.
    ///
    /// Returns `false` when no symbol is selected or it has no timeframes.
    pub fn cycle_timeframe(&mut self, catalog: &SymbolCatalog, step: isize) -> bool {
        let Some(symbol) = self.symbol() else {
            return false;
        };
        let timeframes: Vec<&str> = catalog.timeframes(symbol).collect();
        if timeframes.is_empty() {
            return false;
        }
        let current = self
            .timeframe()
            .and_then(|tf| timeframes.iter().position(|t| *t == tf));
        let next = match current {
            Some(i) => wrap(i, step, timeframes.len()),
            None => 0,
        };
        let timeframe = timeframes[next].to_string();
        self.set_timeframe(&timeframe);
        true
    }

    /// The key the fetcher watches. Unset fields become empty strings.
    pub fn key(&self) -> FetchKey {
        FetchKey {
            symbol: self.symbol.clone().unwrap_or_default(),
            timeframe: self.timeframe.clone().unwrap_or_default(),
            page: self.page,
        }
    }
}

fn wrap(index: usize, step: isize, len: usize) -> usize {
    (index as isize + step).rem_euclid(len as isize) as usize
}
