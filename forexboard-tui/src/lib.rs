//! ForexBoard TUI: terminal dashboard for historical trade signals.
//!
//! Layout:
//! 1. Selector bar: symbol and timeframe pickers
//! 2. Trade history: paginated signal table, optional price-level chart
//! 3. Pagination bar and status bar
//!
//! Network requests run on a background worker; see [`worker`].

pub mod app;
pub mod input;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use theme::Theme;
