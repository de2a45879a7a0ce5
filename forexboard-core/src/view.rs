//! Result view model: what to show for the current fetch state.
//!
//! Rendering front-ends (the TUI table, the CLI printer) only lay out the
//! strings produced here.

use chrono::NaiveDateTime;

use crate::fetch::{FetchFailure, FetchState};
use crate::signal::{SignalKind, TradePage, TradeSignal, PAGE_SIZE};

/// en-US style date-time, e.g. `3/1/2024, 2:00:00 PM`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

pub const LOADING_TEXT: &str = "Loading trade data...";

/// One formatted table row.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeRow {
    /// Running 1-based index across pages.
    pub index: u64,
    pub kind: SignalKind,
    pub entry_price: String,
    pub target: String,
    pub stop_loss: String,
    pub timestamp: String,
}

/// What the result area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Loading,
    Message(&'static str),
    Table {
        rows: Vec<TradeRow>,
        total_pages: u32,
    },
}

impl ResultView {
    /// Build the view for `state`, numbering rows as page `page`.
    pub fn build(state: &FetchState, page: u32, timestamp_format: &str) -> Self {
        match state {
            FetchState::Idle => ResultView::Message(FetchFailure::MissingSelection.message()),
            FetchState::Loading(_) => ResultView::Loading,
            FetchState::Failed(failure) => ResultView::Message(failure.message()),
            FetchState::Loaded(trades) if trades.is_empty() => {
                ResultView::Message(FetchFailure::EmptyResult.message())
            }
            FetchState::Loaded(trades) => ResultView::Table {
                rows: rows(trades, page, timestamp_format),
                total_pages: trades.total_pages,
            },
        }
    }

    pub fn text(&self) -> Option<&'static str> {
        match self {
            ResultView::Loading => Some(LOADING_TEXT),
            ResultView::Message(text) => Some(*text),
            ResultView::Table { .. } => None,
        }
    }
}

/// Formatted rows of a loaded page.
pub fn rows(trades: &TradePage, page: u32, timestamp_format: &str) -> Vec<TradeRow> {
    trades
        .signals
        .iter()
        .enumerate()
        .map(|(i, s)| row(s, row_number(page, i), timestamp_format))
        .collect()
}

fn row(signal: &TradeSignal, index: u64, timestamp_format: &str) -> TradeRow {
    TradeRow {
        index,
        kind: signal.kind,
        entry_price: format_price(signal.entry_price),
        target: format_price(signal.target),
        stop_loss: format_price(signal.stop_loss),
        timestamp: format_timestamp(&signal.timestamp, timestamp_format),
    }
}

/// Running index of row `i` (0-based) on `page` (1-based).
pub fn row_number(page: u32, i: usize) -> u64 {
    (u64::from(page.max(1)) - 1) * u64::from(PAGE_SIZE) + i as u64 + 1
}

/// Price rounded to 4 decimal places, ties away from zero.
pub fn format_price(value: f64) -> String {
    format!("{:.4}", (value * 1e4).round() / 1e4)
}

pub fn format_timestamp(ts: &NaiveDateTime, format: &str) -> String {
    ts.format(format).to_string()
}

/// Server-side totals shown above the table, when the service sends them.
pub fn summary_line(trades: &TradePage) -> Option<String> {
    let s = &trades.summary;
    let mut parts = Vec::new();
    if let Some(n) = s.total_signals {
        parts.push(format!("{n} signals"));
    }
    if let Some(pl) = s.total_profit_loss {
        parts.push(format!("P/L {pl:+.2}"));
    }
    if let Some(cap) = s.final_capital {
        parts.push(format!("final capital {cap:.2}"));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}
