//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDateTime;

use forexboard_core::{FetchTicket, Session, TradeSignal};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Which selector or table has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Symbol,
    Timeframe,
    Trades,
}

impl Focus {
    pub fn label(self) -> &'static str {
        match self {
            Focus::Symbol => "Symbol",
            Focus::Timeframe => "Timeframe",
            Focus::Trades => "Trades",
        }
    }

    pub fn next(self) -> Focus {
        match self {
            Focus::Symbol => Focus::Timeframe,
            Focus::Timeframe => Focus::Trades,
            Focus::Trades => Focus::Symbol,
        }
    }

    pub fn prev(self) -> Focus {
        match self {
            Focus::Symbol => Focus::Trades,
            Focus::Timeframe => Focus::Symbol,
            Focus::Trades => Focus::Timeframe,
        }
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Symbol catalogue could not be loaded.
    Catalog,
    /// Trade history request failed.
    Network,
    /// Channel to the worker broke.
    Worker,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Catalog => "CAT",
            ErrorCategory::Network => "NET",
            ErrorCategory::Worker => "WRK",
        }
    }
}

/// Modal overlays drawn on top of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
    /// Detail view of the row at this index on the current page.
    Detail(usize),
}

const ERROR_HISTORY_CAP: usize = 50;

pub struct AppState {
    pub session: Session,
    pub focus: Focus,
    /// Highlighted row on the current page.
    pub cursor: usize,
    pub chart_visible: bool,
    pub running: bool,

    // Worker
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    /// Newest fetch generation, read by the worker to skip stale tickets.
    pub latest_generation: Arc<AtomicU64>,
    pub catalog_loading: bool,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
    pub api_base_url: String,
}

impl AppState {
    pub fn new(
        session: Session,
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        latest_generation: Arc<AtomicU64>,
        api_base_url: String,
    ) -> Self {
        Self {
            session,
            focus: Focus::Symbol,
            cursor: 0,
            chart_visible: false,
            running: true,
            worker_tx,
            worker_rx,
            latest_generation,
            catalog_loading: false,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            api_base_url,
        }
    }

    /// Ask the worker for the symbol catalogue.
    pub fn request_catalog(&mut self) {
        if self.catalog_loading {
            return;
        }
        if self.send(WorkerCommand::LoadCatalog) {
            self.catalog_loading = true;
            self.set_status(format!("Loading symbols from {}...", self.api_base_url));
        }
    }

    /// Publish the session's generation and hand `ticket` to the worker.
    ///
    /// Called after every session mutation, including those that produced no
    /// ticket, so that a cleared selection also supersedes queued requests.
    pub fn dispatch(&mut self, ticket: Option<FetchTicket>) {
        self.latest_generation
            .store(self.session.generation(), Ordering::Release);
        if let Some(ticket) = ticket {
            self.cursor = 0;
            self.send(WorkerCommand::FetchPage(ticket));
        }
    }

    fn send(&mut self, cmd: WorkerCommand) -> bool {
        match self.worker_tx.send(cmd) {
            Ok(()) => true,
            Err(e) => {
                self.push_error(
                    ErrorCategory::Worker,
                    "Background worker stopped".into(),
                    e.to_string(),
                );
                false
            }
        }
    }

    pub fn handle_worker_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Catalog(result) => {
                self.catalog_loading = false;
                match &result {
                    Ok(catalog) => {
                        self.set_status(format!("{} symbols loaded", catalog.len()));
                    }
                    Err(err) => {
                        self.push_error(
                            ErrorCategory::Catalog,
                            format!("Failed to load symbols: {err}"),
                            self.api_base_url.clone(),
                        );
                    }
                }
                let ticket = self.session.apply_catalog(result);
                self.dispatch(ticket);
            }
            WorkerResponse::Page { ticket, result } => {
                let error = result.as_ref().err().map(|e| e.to_string());
                if !self.session.resolve(&ticket, result) {
                    return;
                }
                self.cursor = 0;
                match error {
                    Some(err) => self.push_error(
                        ErrorCategory::Network,
                        "Failed to load trade history.".into(),
                        format!("{}: {err}", ticket.key),
                    ),
                    None => self.status_message = None,
                }
            }
        }
    }

    /// Signals of the current page, empty unless a table is shown.
    pub fn signals(&self) -> &[TradeSignal] {
        self.session
            .trades()
            .map(|p| p.signals.as_slice())
            .unwrap_or(&[])
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.signals().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let next = self.cursor as isize + delta;
        self.cursor = next.clamp(0, len as isize - 1) as usize;
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
