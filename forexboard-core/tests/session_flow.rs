//! End-to-end session flow against an in-memory backtest service.

use std::sync::Mutex;

use forexboard_core::signal::SignalQuery;
use forexboard_core::{
    ApiError, BacktestApi, FetchTicket, Nav, PageControl, ResultView, Session, SignalKind,
    SignalResponse, SymbolCatalog,
};

const SYMBOLS: &str = r#"{
    "EURUSD": {"DAY": "EURUSDDAY.csv", "1H": "EURUSD1H.csv"},
    "USDJPY": {"4H": "USDJPY4H.csv"},
    "XAUUSD": {}
}"#;

/// 45 signals for EURUSD/DAY, nothing for anything else.
struct MockApi {
    fail_symbols: bool,
    queries: Mutex<Vec<SignalQuery>>,
}

impl MockApi {
    fn new() -> Self {
        Self {
            fail_symbols: false,
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl BacktestApi for MockApi {
    fn symbols(&self) -> Result<SymbolCatalog, ApiError> {
        if self.fail_symbols {
            return Err(ApiError::NetworkUnreachable("connection refused".into()));
        }
        serde_json::from_str(SYMBOLS).map_err(|e| ApiError::ResponseFormat(e.to_string()))
    }

    fn signals(&self, query: &SignalQuery) -> Result<SignalResponse, ApiError> {
        self.queries.lock().unwrap().push(query.clone());
        if query.symbol != "EURUSD" || query.timeframe != "DAY" {
            return Ok(serde_json::from_str(r#"{"signals": [], "summary": {"total_pages": 1}}"#)
                .unwrap());
        }

        let total = 45u32;
        let total_pages = total.div_ceil(query.limit);
        let start = (query.page - 1) * query.limit;
        let end = (start + query.limit).min(total);
        let signals: Vec<String> = (start..end)
            .map(|i| {
                let kind = if i % 2 == 0 { "BUY" } else { "SELL" };
                format!(
                    r#"{{"timestamp": "2024-01-{:02} 00:00:00", "type": "{kind}",
                        "entry_price": 1.1, "stop_loss": 1.089, "target": 1.133}}"#,
                    i % 28 + 1
                )
            })
            .collect();
        let body = format!(
            r#"{{"signals": [{}], "summary": {{"total_pages": {total_pages}, "total_signals": {total}, "current_page": {}}}}}"#,
            signals.join(","),
            query.page
        );
        serde_json::from_str(&body).map_err(|e| ApiError::ResponseFormat(e.to_string()))
    }
}

/// Execute a ticket synchronously.
fn run(api: &MockApi, session: &mut Session, ticket: Option<FetchTicket>) -> bool {
    match ticket {
        Some(t) => {
            let outcome = api.signals(&t.key.query());
            session.resolve(&t, outcome)
        }
        None => false,
    }
}

fn table(session: &Session) -> (Vec<u64>, u32) {
    match session.view() {
        ResultView::Table { rows, total_pages } => {
            (rows.iter().map(|r| r.index).collect(), total_pages)
        }
        other => panic!("expected a table, got {other:?}"),
    }
}

#[test]
fn browsing_pages_numbers_rows_continuously() {
    let api = MockApi::new();
    let mut session = Session::default();

    let ticket = session.apply_catalog(api.symbols());
    assert!(run(&api, &mut session, ticket));

    let (indices, total_pages) = table(&session);
    assert_eq!(indices, (1..=20).collect::<Vec<_>>());
    assert_eq!(total_pages, 3);

    let ticket = session.navigate(Nav::Next);
    assert!(run(&api, &mut session, ticket));
    let (indices, _) = table(&session);
    assert_eq!(indices, (21..=40).collect::<Vec<_>>());

    let ticket = session.navigate(Nav::Last);
    assert!(run(&api, &mut session, ticket));
    let (indices, _) = table(&session);
    assert_eq!(indices, (41..=45).collect::<Vec<_>>());
    assert!(session
        .controls()
        .contains(&PageControl::Next { disabled: true }));

    let queries = api.queries.lock().unwrap();
    assert_eq!(
        queries.iter().map(|q| q.page).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert!(queries.iter().all(|q| q.limit == 20));
}

#[test]
fn empty_timeframe_symbols_are_not_offered() {
    let api = MockApi::new();
    let mut session = Session::default();
    session.apply_catalog(api.symbols());
    let symbols: Vec<&str> = session.catalog().symbols().collect();
    assert_eq!(symbols, vec!["EURUSD", "USDJPY"]);
}

#[test]
fn switching_symbol_to_empty_history_shows_message() {
    let api = MockApi::new();
    let mut session = Session::default();
    let ticket = session.apply_catalog(api.symbols());
    run(&api, &mut session, ticket);

    let ticket = session.cycle_symbol(1);
    assert_eq!(session.selection().symbol(), Some("USDJPY"));
    assert_eq!(session.selection().timeframe(), Some("4H"));
    assert!(run(&api, &mut session, ticket));
    assert_eq!(session.view().text(), Some("No trade history available."));
    assert!(session.controls().is_empty());
}

#[test]
fn late_response_for_old_page_is_ignored() {
    let api = MockApi::new();
    let mut session = Session::default();
    let first = session.apply_catalog(api.symbols()).unwrap();
    // Page 1 is still in flight when the user changes timeframe.
    let second = session.set_timeframe("1H").unwrap();

    let late = api.signals(&first.key.query());
    let fresh = api.signals(&second.key.query());
    assert!(session.resolve(&second, fresh));
    assert!(!session.resolve(&first, late));

    assert_eq!(session.view().text(), Some("No trade history available."));
}

#[test]
fn catalogue_failure_then_reload() {
    let mut api = MockApi::new();
    api.fail_symbols = true;
    let mut session = Session::default();

    assert!(session.apply_catalog(api.symbols()).is_none());
    assert!(matches!(
        session.catalog_error(),
        Some(ApiError::NetworkUnreachable(_))
    ));

    api.fail_symbols = false;
    let ticket = session.apply_catalog(api.symbols());
    assert!(run(&api, &mut session, ticket));
    assert!(session.catalog_error().is_none());
    let page = session.trades().unwrap();
    assert_eq!(page.signals[0].kind, SignalKind::Buy);
    assert_eq!(page.signals[1].kind, SignalKind::Sell);
}

#[test]
fn request_failure_then_refresh() {
    let api = MockApi::new();
    let mut session = Session::default();
    let ticket = session.apply_catalog(api.symbols()).unwrap();
    session.resolve(&ticket, Err(ApiError::Timeout));
    assert_eq!(session.view().text(), Some("Failed to load trade history."));

    let ticket = session.refresh();
    assert_eq!(session.view(), ResultView::Loading);
    assert!(run(&api, &mut session, ticket));
    assert_eq!(table(&session).0.len(), 20);
}
