//! Trade history table, or the message that replaces it.

use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;

use forexboard_core::view::{summary_line, TradeRow, LOADING_TEXT};
use forexboard_core::ResultView;

use crate::app::{AppState, Focus};
use crate::theme::{self, Theme};

const HEADERS: [&str; 6] = ["#", "Type", "Entry Price", "Target", "Stop Loss", "Timestamp"];

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let focused = app.focus == Focus::Trades;
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(focused))
        .title(" Trade History ")
        .title_style(theme::panel_title(focused));

    if let Some(summary) = app.session.trades().and_then(summary_line) {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {summary} "),
            theme::muted(),
        )));
    }

    match app.session.view() {
        ResultView::Table { rows, .. } => render_table(f, area, block, &rows, app.cursor),
        view => {
            // Nothing can be selected until the catalogue arrives.
            let text = if app.catalog_loading {
                LOADING_TEXT
            } else {
                view.text().unwrap_or_default()
            };
            let style = if app.session.fetch_state().failure().is_some() {
                theme::warning()
            } else {
                theme::muted()
            };
            let lines = vec![Line::from(""), Line::from(Span::styled(text, style))];
            let para = Paragraph::new(lines)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(para, area);
        }
    }
}

fn render_table(f: &mut Frame, area: Rect, block: Block, rows: &[TradeRow], cursor: usize) {
    let palette = Theme::default();

    let header_cells = HEADERS
        .iter()
        .map(|h| Cell::from(*h).style(theme::accent_bold()));
    let header = Row::new(header_cells).height(1);

    let body = rows.iter().map(|row| {
        let cells = vec![
            Cell::from(row.index.to_string()).style(theme::muted()),
            Cell::from(row.kind.label()).style(theme::signal(row.kind)),
            Cell::from(row.entry_price.clone()),
            Cell::from(row.target.clone()),
            Cell::from(row.stop_loss.clone()),
            Cell::from(row.timestamp.clone()),
        ];
        Row::new(cells).style(theme::text()).height(1)
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Min(22),
    ];

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .bg(palette.neutral)
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        );

    let selected = cursor.min(rows.len().saturating_sub(1));
    let mut state = TableState::default().with_selected(Some(selected));
    f.render_stateful_widget(table, area, &mut state);
}
