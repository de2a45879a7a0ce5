//! Overlay widgets: help, signal detail, error history.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use forexboard_core::view::{format_price, format_timestamp, row_number};

use crate::app::AppState;
use crate::theme;
use crate::ui::centered_rect;

/// Keyboard reference.
pub fn render_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::accent())
        .title(" Keys [any key] close ")
        .title_style(theme::accent_bold());

    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global");
    key(&mut lines, "Tab / Shift+Tab", "Cycle focus: symbol, timeframe, trades");
    key(&mut lines, "n / p", "Next / previous page");
    key(&mut lines, "Home / End", "First / last page");
    key(&mut lines, "r", "Reload the current page");
    key(&mut lines, "C", "Reload the symbol list");
    key(&mut lines, "c", "Toggle the price-level chart");
    key(&mut lines, "e", "Open error history");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Symbol / Timeframe");
    key(&mut lines, "h / l", "Previous / next value");
    key(&mut lines, "Enter", "Jump to the trade table");
    lines.push(Line::from(""));

    section(&mut lines, "Trades");
    key(&mut lines, "j / k", "Move row cursor");
    key(&mut lines, "h / l", "Previous / next page");
    key(&mut lines, "g / G", "First / last page");
    key(&mut lines, "Enter", "Signal detail");

    let para = Paragraph::new(lines).block(block);
    f.render_widget(para, popup);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}

/// Error history overlay.
pub fn render_error_history(f: &mut Frame, area: Rect, app: &AppState) {
    let popup = centered_rect(80, 70, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::negative())
        .title(format!(
            " Error History ({}) [Esc]close [j/k]scroll ",
            app.error_history.len()
        ))
        .title_style(theme::negative());

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    if app.error_history.is_empty() {
        let text = Paragraph::new(Span::styled("No errors recorded.", theme::muted()));
        f.render_widget(text, inner);
        return;
    }

    let visible_height = inner.height as usize;
    let start = app.error_scroll;
    let end = (start + visible_height).min(app.error_history.len());

    let mut lines: Vec<Line> = Vec::new();
    for (i, err) in app.error_history.iter().enumerate().take(end).skip(start) {
        let style = if i == app.error_scroll {
            theme::negative().add_modifier(Modifier::BOLD)
        } else {
            theme::muted()
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", err.timestamp.format("%H:%M:%S")),
                theme::muted(),
            ),
            Span::styled(format!("[{}] ", err.category.label()), theme::warning()),
            Span::styled(err.message.as_str(), style),
        ]));

        if !err.context.is_empty() {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(err.context.as_str(), theme::muted()),
            ]));
        }
    }

    let para = Paragraph::new(lines);
    f.render_widget(para, inner);
}

/// Detail card for the signal at `idx` on the current page.
pub fn render_detail(f: &mut Frame, area: Rect, app: &AppState, idx: usize) {
    let Some(signal) = app.signals().get(idx) else {
        return;
    };
    let popup = centered_rect(50, 60, area);
    f.render_widget(Clear, popup);

    let number = row_number(app.session.selection().page(), idx);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::signal(signal.kind))
        .title(format!(" Signal #{number} [Esc]close [j/k]step "))
        .title_style(theme::signal(signal.kind).add_modifier(Modifier::BOLD));

    let selection = app.session.selection();
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            signal.kind.description(),
            theme::signal(signal.kind).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field(
            "Pair",
            format!(
                "{} {}",
                selection.symbol().unwrap_or("-"),
                selection.timeframe().unwrap_or("-")
            ),
        ),
        field(
            "Time",
            format_timestamp(&signal.timestamp, app.session.timestamp_format()),
        ),
        field("Entry", format_price(signal.entry_price)),
        field("Target", format_price(signal.target)),
        field("Stop loss", format_price(signal.stop_loss)),
    ];

    if let Some(pl) = signal.profit_loss {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:>10}  ", "P/L"), theme::muted()),
            Span::styled(format!("{pl:+.2}"), theme::pnl(pl)),
        ]));
    }
    if let Some(capital) = signal.capital {
        lines.push(field("Capital", format!("{capital:.2}")));
    }

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:>10}  ", label), theme::muted()),
        Span::styled(value, theme::text()),
    ])
}
