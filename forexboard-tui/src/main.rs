//! `forexboard`: terminal dashboard for the forex backtest service.

use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicU64;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use forexboard_core::{BacktestApi, DashboardConfig, HttpBacktestApi, Session};
use forexboard_tui::app::AppState;
use forexboard_tui::worker::{self, WorkerCommand};
use forexboard_tui::{input, ui};

#[derive(Parser)]
#[command(
    name = "forexboard",
    version,
    about = "ForexBoard: browse historical forex trade signals in the terminal"
)]
struct Args {
    /// Path to a TOML config file. Defaults to <config_dir>/forexboard/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backtest service base URL (overrides config and FOREXBOARD_API_URL).
    #[arg(long)]
    api_url: Option<String>,

    /// Log file. Defaults to <cache_dir>/forexboard/forexboard.log.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DashboardConfig::load(args.config.as_deref(), args.api_url)?;

    let log_path = args.log_file.unwrap_or_else(default_log_path);
    init_logging(&config, &log_path)?;
    log::info!("starting forexboard against {}", config.api_base_url);

    let api: Arc<dyn BacktestApi> = Arc::new(HttpBacktestApi::from_config(&config)?);

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        log::error!("panic: {info}");
        default_hook(info);
    }));

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let latest_generation = Arc::new(AtomicU64::new(0));

    let worker_handle = worker::spawn_worker(api, cmd_rx, resp_tx, latest_generation.clone())
        .context("failed to spawn worker thread")?;

    let mut app = AppState::new(
        Session::from_config(&config),
        cmd_tx.clone(),
        resp_rx,
        latest_generation,
        config.api_base_url.clone(),
    );
    app.request_catalog();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Shutdown worker. A request in flight finishes before it sees this.
    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    drop(app);
    let _ = worker_handle.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("exiting");
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_worker_response(resp);
        }

        // 3. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 4. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}

fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("forexboard")
        .join("forexboard.log")
}

/// Route `log` records to `path`; the terminal belongs to the UI.
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &DashboardConfig, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("cannot open log file {}", path.display()))?;

    env_logger::Builder::new()
        .filter_level(config.level_filter()?)
        .parse_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .context("logger already initialised")?;
    Ok(())
}
