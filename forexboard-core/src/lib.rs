//! ForexBoard Core: client-side model of the trade-signal dashboard.
//!
//! This crate contains everything except the terminal:
//! - Symbol catalogue parsed from the backtest service
//! - Selection state (symbol, timeframe, page) with reset rules
//! - Trade-page fetch state machine with generation-checked results
//! - Pagination controls and the formatted result view
//! - Blocking HTTP client and configuration loading

pub mod api;
pub mod catalog;
pub mod config;
pub mod fetch;
pub mod pagination;
pub mod selection;
pub mod session;
pub mod signal;
pub mod view;

pub use api::{ApiError, BacktestApi, HttpBacktestApi};
pub use catalog::SymbolCatalog;
pub use config::{ConfigError, DashboardConfig};
pub use fetch::{FetchFailure, FetchKey, FetchState, FetchTicket, TradeFetcher};
pub use pagination::{Nav, PageControl};
pub use selection::Selection;
pub use session::Session;
pub use signal::{SignalKind, SignalResponse, TradePage, TradeSignal, PAGE_SIZE};
pub use view::{ResultView, TradeRow};
