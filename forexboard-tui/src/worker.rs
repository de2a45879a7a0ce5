//! Background worker thread: all network I/O runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Every
//! [`FetchTicket`] carries the generation it was issued for; the main thread
//! publishes the newest generation through a shared atomic so the worker can
//! skip requests that were superseded while still queued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use forexboard_core::{ApiError, BacktestApi, FetchTicket, SignalResponse, SymbolCatalog};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    LoadCatalog,
    FetchPage(FetchTicket),
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    Catalog(Result<SymbolCatalog, ApiError>),
    Page {
        ticket: FetchTicket,
        result: Result<SignalResponse, ApiError>,
    },
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    api: Arc<dyn BacktestApi>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    latest_generation: Arc<AtomicU64>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("forexboard-worker".into())
        .spawn(move || {
            worker_loop(api.as_ref(), rx, tx, &latest_generation);
        })
}

fn worker_loop(
    api: &dyn BacktestApi,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    latest_generation: &AtomicU64,
) {
    loop {
        let response = match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::LoadCatalog) => WorkerResponse::Catalog(api.symbols()),
            Ok(WorkerCommand::FetchPage(ticket)) => {
                let latest = latest_generation.load(Ordering::Acquire);
                if ticket.generation < latest {
                    log::debug!(
                        "skipping fetch #{} for {}, superseded by #{latest}",
                        ticket.generation,
                        ticket.key
                    );
                    continue;
                }
                let result = api.signals(&ticket.key.query());
                WorkerResponse::Page { ticket, result }
            }
        };

        if tx.send(response).is_err() {
            // UI is gone.
            break;
        }
    }
}
