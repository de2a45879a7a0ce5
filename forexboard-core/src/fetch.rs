//! Trade-page fetch state machine.
//!
//! The fetcher never performs I/O. It watches the selection's [`FetchKey`],
//! hands out a [`FetchTicket`] whenever a request is due, and accepts the
//! outcome back through [`TradeFetcher::resolve`]. Every ticket carries a
//! generation number; only the newest generation may change the state, so a
//! slow response for an old selection can never overwrite a newer one.

use std::fmt;

use crate::api::ApiError;
use crate::selection::Selection;
use crate::signal::{SignalQuery, SignalResponse, TradePage, PAGE_SIZE};

/// The `(symbol, timeframe, page)` triple a fetch is keyed on.
///
/// Unset selection fields are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub symbol: String,
    pub timeframe: String,
    pub page: u32,
}

impl FetchKey {
    pub fn is_complete(&self) -> bool {
        !self.symbol.is_empty() && !self.timeframe.is_empty()
    }

    /// Query parameters for `GET /backtest/`.
    pub fn query(&self) -> SignalQuery {
        SignalQuery {
            symbol: self.symbol.clone(),
            timeframe: self.timeframe.clone(),
            page: self.page,
            limit: PAGE_SIZE,
        }
    }
}

impl fmt::Display for FetchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} p{}", self.symbol, self.timeframe, self.page)
    }
}

/// Permission to perform one request; hand it back with the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub key: FetchKey,
}

/// Why a fetch cycle ended without a table to show.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchFailure {
    /// Symbol or timeframe not chosen yet; no request was made.
    MissingSelection,
    /// The request succeeded but returned no signals.
    EmptyResult,
    /// The request failed. The underlying error is kept for logging.
    NetworkFailure(ApiError),
}

impl FetchFailure {
    /// Text shown to the user in place of the table.
    pub fn message(&self) -> &'static str {
        match self {
            FetchFailure::MissingSelection => "Please select a symbol and timeframe.",
            FetchFailure::EmptyResult => "No trade history available.",
            FetchFailure::NetworkFailure(_) => "Failed to load trade history.",
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Exactly one of these is active per fetch cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading(FetchKey),
    Loaded(TradePage),
    Failed(FetchFailure),
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading(_))
    }

    pub fn page(&self) -> Option<&TradePage> {
        match self {
            FetchState::Loaded(page) => Some(page),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            FetchState::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Owns the [`FetchState`] and the generation counter.
#[derive(Debug, Default)]
pub struct TradeFetcher {
    state: FetchState,
    generation: u64,
    last_key: Option<FetchKey>,
}

impl TradeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Generation of the most recent cycle. Tickets with a lower number are
    /// stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// React to the selection. Starts a new cycle only when its key differs
    /// from the last one seen.
    pub fn sync(&mut self, selection: &Selection) -> Option<FetchTicket> {
        let key = selection.key();
        if self.last_key.as_ref() == Some(&key) {
            return None;
        }
        self.start(key)
    }

    /// Start a new cycle for the selection even if its key is unchanged.
    pub fn refresh(&mut self, selection: &Selection) -> Option<FetchTicket> {
        self.start(selection.key())
    }

    fn start(&mut self, key: FetchKey) -> Option<FetchTicket> {
        // Any cycle, including one that never issues a request, supersedes
        // whatever is still in flight.
        self.generation += 1;
        self.last_key = Some(key.clone());

        if !key.is_complete() {
            self.state = FetchState::Failed(FetchFailure::MissingSelection);
            return None;
        }

        log::debug!("fetch #{} start: {key}", self.generation);
        self.state = FetchState::Loading(key.clone());
        Some(FetchTicket {
            generation: self.generation,
            key,
        })
    }

    /// Apply the outcome of a ticket. Returns `false` (and changes nothing)
    /// if the ticket has been superseded.
    pub fn resolve(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<SignalResponse, ApiError>,
    ) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "fetch #{} for {} superseded by #{}, dropping result",
                ticket.generation,
                ticket.key,
                self.generation
            );
            return false;
        }

        self.state = match outcome {
            Ok(response) => match TradePage::from_response(response) {
                Some(page) => {
                    log::info!(
                        "loaded {} signals for {} ({} pages)",
                        page.signals.len(),
                        ticket.key,
                        page.total_pages
                    );
                    FetchState::Loaded(page)
                }
                None => {
                    log::info!("no signals for {}", ticket.key);
                    FetchState::Failed(FetchFailure::EmptyResult)
                }
            },
            Err(err) => {
                log::warn!("trade history request for {} failed: {err}", ticket.key);
                FetchState::Failed(FetchFailure::NetworkFailure(err))
            }
        };
        true
    }
}
