//! ForexBoard CLI: scriptable access to the backtest service.
//!
//! Commands:
//! - `symbols`: list symbols and their timeframes
//! - `trades`: print one page of trade signals for a symbol/timeframe

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use forexboard_core::view::summary_line;
use forexboard_core::{
    BacktestApi, DashboardConfig, FetchTicket, HttpBacktestApi, PageControl, ResultView, Session,
    TradeRow,
};

#[derive(Parser)]
#[command(
    name = "forexboard-cli",
    version,
    about = "ForexBoard CLI: query historical forex trade signals"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to <config_dir>/forexboard/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backtest service base URL (overrides config and FOREXBOARD_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log debug output to stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available symbols and their timeframes.
    Symbols,
    /// Print one page of trade signals.
    Trades {
        /// Symbol, e.g. EURUSD. Defaults to the configured default symbol.
        #[arg(long)]
        symbol: Option<String>,

        /// Timeframe, e.g. DAY or 1H. Defaults to the configured default timeframe.
        #[arg(long)]
        timeframe: Option<String>,

        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref(), cli.api_url)?;

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        config.level_filter()?.min(log::LevelFilter::Warn)
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let api = HttpBacktestApi::from_config(&config)?;
    log::debug!("using {}", api.base_url());

    match cli.command {
        Commands::Symbols => run_symbols(&api),
        Commands::Trades {
            symbol,
            timeframe,
            page,
        } => run_trades(&api, &config, symbol, timeframe, page),
    }
}

fn run_symbols(api: &dyn BacktestApi) -> Result<()> {
    let catalog = api.symbols().context("Failed to load symbols")?;
    if catalog.is_empty() {
        println!("No symbols available.");
        return Ok(());
    }
    for entry in catalog.entries() {
        let timeframes: Vec<&str> = entry.timeframes.iter().map(|t| t.name.as_str()).collect();
        println!("{:<10} {}", entry.symbol, timeframes.join(", "));
    }
    Ok(())
}

fn run_trades(
    api: &dyn BacktestApi,
    config: &DashboardConfig,
    symbol: Option<String>,
    timeframe: Option<String>,
    page: u32,
) -> Result<()> {
    let mut session = Session::from_config(config);
    let catalog = api.symbols().context("Failed to load symbols")?;

    // Each step supersedes the previous ticket; only the last one is fetched.
    let mut ticket = session.apply_catalog(Ok(catalog));
    check_selection(&session, symbol.as_deref(), timeframe.as_deref())?;
    if let Some(s) = symbol.as_deref() {
        ticket = session.set_symbol(s).or(ticket);
    }
    if let Some(tf) = timeframe.as_deref() {
        ticket = session.set_timeframe(tf).or(ticket);
    }
    ticket = session.set_page(page).or(ticket);

    execute(api, &mut session, ticket);
    print_view(&session);
    Ok(())
}

/// Reject a symbol/timeframe the catalogue does not list. Without `--symbol`
/// the timeframe is checked against the symbol the session starts on.
fn check_selection(
    session: &Session,
    symbol: Option<&str>,
    timeframe: Option<&str>,
) -> Result<()> {
    let catalog = session.catalog();
    if let Some(s) = symbol {
        if !catalog.contains_symbol(s) {
            let known: Vec<&str> = catalog.symbols().collect();
            bail!("unknown symbol '{s}' (available: {})", known.join(", "));
        }
    }
    let target = symbol.or(session.selection().symbol());
    if let (Some(s), Some(tf)) = (target, timeframe) {
        if !catalog.has_timeframe(s, tf) {
            let known: Vec<&str> = catalog.timeframes(s).collect();
            bail!("no timeframe '{tf}' for {s} (available: {})", known.join(", "));
        }
    }
    Ok(())
}

fn execute(api: &dyn BacktestApi, session: &mut Session, ticket: Option<FetchTicket>) {
    let Some(ticket) = ticket.filter(|t| session.is_current(t)) else {
        return;
    };
    let outcome = api.signals(&ticket.key.query());
    if let Err(err) = &outcome {
        eprintln!("Error for {}: {err}", ticket.key);
    }
    session.resolve(&ticket, outcome);
}

fn print_view(session: &Session) {
    let selection = session.selection();
    println!(
        "{} {} page {}",
        selection.symbol().unwrap_or("-"),
        selection.timeframe().unwrap_or("-"),
        selection.page()
    );

    match session.view() {
        ResultView::Table { rows, total_pages } => {
            print_rows(&rows);
            println!();
            if let Some(summary) = session.trades().and_then(summary_line) {
                println!("{summary}");
            }
            println!("Page {} of {total_pages}", selection.page());
            let controls = session.controls();
            if !controls.is_empty() {
                println!("{}", pagination_text(&controls));
            }
        }
        view => println!("{}", view.text().unwrap_or_default()),
    }
}

fn print_rows(rows: &[TradeRow]) {
    println!(
        "{:>5}  {:<5}  {:>12}  {:>12}  {:>12}  Timestamp",
        "#", "Type", "Entry Price", "Target", "Stop Loss"
    );
    for row in rows {
        println!(
            "{:>5}  {:<5}  {:>12}  {:>12}  {:>12}  {}",
            row.index,
            row.kind.label(),
            row.entry_price,
            row.target,
            row.stop_loss,
            row.timestamp
        );
    }
}

fn pagination_text(controls: &[PageControl]) -> String {
    controls
        .iter()
        .map(|c| match c {
            PageControl::Page { active: true, .. } => format!("[{}]", c.label()),
            _ => c.label(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
