//! Dashboard session: catalogue, selection and fetcher wired together.
//!
//! Every mutation returns the [`FetchTicket`] to execute, if any. The caller
//! performs the request (on a worker thread or inline) and hands the outcome
//! back through [`Session::resolve`].

use crate::api::ApiError;
use crate::catalog::SymbolCatalog;
use crate::config::DashboardConfig;
use crate::fetch::{FetchState, FetchTicket, TradeFetcher};
use crate::pagination::{self, Nav, PageControl};
use crate::selection::Selection;
use crate::signal::{SignalResponse, TradePage};
use crate::view::{ResultView, DEFAULT_TIMESTAMP_FORMAT};

#[derive(Debug)]
pub struct Session {
    catalog: SymbolCatalog,
    catalog_loaded: bool,
    catalog_error: Option<ApiError>,
    selection: Selection,
    fetcher: TradeFetcher,
    preferred_symbol: String,
    preferred_timeframe: String,
    timestamp_format: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new("EURUSD", "DAY", DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl Session {
    pub fn new(preferred_symbol: &str, preferred_timeframe: &str, timestamp_format: &str) -> Self {
        Self {
            catalog: SymbolCatalog::default(),
            catalog_loaded: false,
            catalog_error: None,
            selection: Selection::default(),
            fetcher: TradeFetcher::new(),
            preferred_symbol: preferred_symbol.to_string(),
            preferred_timeframe: preferred_timeframe.to_string(),
            timestamp_format: timestamp_format.to_string(),
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        Self::new(
            &config.default_symbol,
            &config.default_timeframe,
            &config.timestamp_format,
        )
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }

    /// A catalogue response has been applied at least once.
    pub fn catalog_loaded(&self) -> bool {
        self.catalog_loaded
    }

    /// Error of the most recent catalogue load, cleared by a successful one.
    pub fn catalog_error(&self) -> Option<&ApiError> {
        self.catalog_error.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn fetch_state(&self) -> &FetchState {
        self.fetcher.state()
    }

    pub fn generation(&self) -> u64 {
        self.fetcher.generation()
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Apply a catalogue load.
    ///
    /// On success the current selection survives a reload if the new
    /// catalogue still lists it; otherwise the selection restarts from the
    /// preferred defaults. On failure the previous catalogue is kept.
    pub fn apply_catalog(
        &mut self,
        outcome: Result<SymbolCatalog, ApiError>,
    ) -> Option<FetchTicket> {
        match outcome {
            Ok(catalog) => {
                log::info!("catalogue loaded: {} symbols", catalog.len());
                let still_valid = match (self.selection.symbol(), self.selection.timeframe()) {
                    (Some(s), Some(tf)) => catalog.has_timeframe(s, tf),
                    _ => false,
                };
                if !still_valid {
                    self.selection = Selection::from_catalog(
                        &catalog,
                        &self.preferred_symbol,
                        &self.preferred_timeframe,
                    );
                }
                self.catalog = catalog;
                self.catalog_loaded = true;
                self.catalog_error = None;
                self.fetcher.sync(&self.selection)
            }
            Err(err) => {
                log::error!("failed to load symbols: {err}");
                self.catalog_error = Some(err);
                None
            }
        }
    }

    pub fn set_symbol(&mut self, symbol: &str) -> Option<FetchTicket> {
        self.selection.set_symbol(&self.catalog, symbol);
        self.fetcher.sync(&self.selection)
    }

    pub fn set_timeframe(&mut self, timeframe: &str) -> Option<FetchTicket> {
        self.selection.set_timeframe(timeframe);
        self.fetcher.sync(&self.selection)
    }

    pub fn set_page(&mut self, page: u32) -> Option<FetchTicket> {
        self.selection.set_page(page);
        self.fetcher.sync(&self.selection)
    }

    pub fn cycle_symbol(&mut self, step: isize) -> Option<FetchTicket> {
        if !self.selection.cycle_symbol(&self.catalog, step) {
            return None;
        }
        self.fetcher.sync(&self.selection)
    }

    pub fn cycle_timeframe(&mut self, step: isize) -> Option<FetchTicket> {
        if !self.selection.cycle_timeframe(&self.catalog, step) {
            return None;
        }
        self.fetcher.sync(&self.selection)
    }

    /// Follow a pagination control. Does nothing while no table is shown or
    /// the control is disabled.
    pub fn navigate(&mut self, nav: Nav) -> Option<FetchTicket> {
        let total = self.total_pages()?;
        let target = pagination::navigate(self.selection.page(), total, nav)?;
        self.set_page(target)
    }

    /// Re-issue the current request.
    pub fn refresh(&mut self) -> Option<FetchTicket> {
        self.fetcher.refresh(&self.selection)
    }

    /// Apply a fetch outcome. Returns `false` if the ticket was stale.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<SignalResponse, ApiError>,
    ) -> bool {
        self.fetcher.resolve(ticket, outcome)
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        self.fetcher.is_current(ticket)
    }

    /// The loaded page, if the last cycle produced a table.
    pub fn trades(&self) -> Option<&TradePage> {
        self.fetcher.state().page().filter(|p| !p.is_empty())
    }

    pub fn total_pages(&self) -> Option<u32> {
        self.trades().map(|p| p.total_pages)
    }

    pub fn view(&self) -> ResultView {
        ResultView::build(
            self.fetcher.state(),
            self.selection.page(),
            &self.timestamp_format,
        )
    }

    /// Pagination controls; empty unless a table with several pages is shown.
    pub fn controls(&self) -> Vec<PageControl> {
        match self.total_pages() {
            Some(total) => pagination::controls(self.selection.page(), total),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::{PageSummary, SignalKind, TradeSignal};
    use chrono::NaiveDate;

    fn catalog() -> SymbolCatalog {
        SymbolCatalog::from_pairs(vec![
            ("GBPUSD", vec!["1H"]),
            ("EURUSD", vec!["1H", "DAY"]),
        ])
    }

    fn response(n: usize, total_pages: u32) -> SignalResponse {
        let signal = TradeSignal {
            kind: SignalKind::Buy,
            entry_price: 1.25,
            target: 1.2875,
            stop_loss: 1.2375,
            timestamp: NaiveDate::from_ymd_opt(2024, 5, 6)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            profit_loss: None,
            capital: None,
        };
        SignalResponse {
            signals: Some(vec![signal; n]),
            summary: Some(PageSummary {
                total_pages,
                ..PageSummary::default()
            }),
        }
    }

    #[test]
    fn catalogue_load_starts_on_preferred_defaults() {
        let mut session = Session::default();
        let ticket = session.apply_catalog(Ok(catalog())).unwrap();
        assert_eq!(ticket.key.symbol, "EURUSD");
        assert_eq!(ticket.key.timeframe, "DAY");
        assert_eq!(ticket.key.page, 1);
        assert!(session.fetch_state().is_loading());
        assert_eq!(session.view(), ResultView::Loading);
    }

    #[test]
    fn unknown_preferences_fall_back_to_first_entries() {
        let mut session = Session::new("XAUUSD", "5MIN", DEFAULT_TIMESTAMP_FORMAT);
        let ticket = session.apply_catalog(Ok(catalog())).unwrap();
        assert_eq!(ticket.key.symbol, "GBPUSD");
        assert_eq!(ticket.key.timeframe, "1H");
    }

    #[test]
    fn catalogue_failure_is_recorded_and_selection_stays_empty() {
        let mut session = Session::default();
        assert!(session
            .apply_catalog(Err(ApiError::NetworkUnreachable("refused".into())))
            .is_none());
        assert!(session.catalog_error().is_some());
        assert!(!session.catalog_loaded());
        assert_eq!(
            session.view().text(),
            Some("Please select a symbol and timeframe.")
        );

        session.apply_catalog(Ok(catalog())).unwrap();
        assert!(session.catalog_error().is_none());
    }

    #[test]
    fn reload_keeps_a_still_listed_selection() {
        let mut session = Session::default();
        let t = session.apply_catalog(Ok(catalog())).unwrap();
        session.resolve(&t, Ok(response(20, 3)));
        session.navigate(Nav::Next).unwrap();
        assert_eq!(session.selection().page(), 2);

        // Same selection, same key: nothing to refetch.
        assert!(session.apply_catalog(Ok(catalog())).is_none());
        assert_eq!(session.selection().page(), 2);
    }

    #[test]
    fn pagination_only_with_a_table() {
        let mut session = Session::default();
        let t = session.apply_catalog(Ok(catalog())).unwrap();
        assert!(session.controls().is_empty());
        assert!(session.navigate(Nav::Next).is_none());

        session.resolve(&t, Ok(response(20, 4)));
        assert_eq!(session.controls().len(), 8);
        assert!(session.navigate(Nav::Prev).is_none());
        let next = session.navigate(Nav::Last).unwrap();
        assert_eq!(next.key.page, 4);
    }

    #[test]
    fn symbol_change_resets_page_and_keeps_shared_timeframe() {
        let mut session = Session::default();
        let t = session.apply_catalog(Ok(catalog())).unwrap();
        session.resolve(&t, Ok(response(20, 3)));
        session.set_timeframe("1H").unwrap();
        session.set_page(3).unwrap();

        let ticket = session.set_symbol("GBPUSD").unwrap();
        assert_eq!(ticket.key.timeframe, "1H");
        assert_eq!(ticket.key.page, 1);
    }

    #[test]
    fn cycling_an_empty_catalogue_is_a_no_op() {
        let mut session = Session::default();
        assert!(session.cycle_symbol(1).is_none());
        assert!(session.cycle_timeframe(1).is_none());
    }
}
