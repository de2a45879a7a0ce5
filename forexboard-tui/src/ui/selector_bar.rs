//! Symbol and timeframe selectors.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Focus};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let selector_focused = matches!(app.focus, Focus::Symbol | Focus::Timeframe);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(selector_focused))
        .title(format!(" ForexBoard | {} ", app.api_base_url))
        .title_style(theme::panel_title(selector_focused));

    f.render_widget(Paragraph::new(selector_line(app)).block(block), area);
}

/// `Symbol: ‹ EURUSD ›   Timeframe: ‹ DAY ›   [3 symbols]`
pub fn selector_line(app: &AppState) -> Line<'static> {
    let session = &app.session;

    if !session.catalog_loaded() {
        let text = if app.catalog_loading {
            "Loading symbols..."
        } else {
            "No symbols available (press C to retry)"
        };
        let style = if app.catalog_loading {
            theme::muted()
        } else {
            theme::warning()
        };
        return Line::from(Span::styled(format!(" {text}"), style));
    }

    let selection = session.selection();
    let mut spans = Vec::new();
    spans.extend(selector(
        "Symbol",
        selection.symbol(),
        app.focus == Focus::Symbol,
    ));
    spans.push(Span::raw("   "));
    spans.extend(selector(
        "Timeframe",
        selection.timeframe(),
        app.focus == Focus::Timeframe,
    ));
    spans.push(Span::styled(
        format!("   [{} symbols]", session.catalog().len()),
        theme::muted(),
    ));
    Line::from(spans)
}

fn selector(label: &str, value: Option<&str>, focused: bool) -> Vec<Span<'static>> {
    let value_style = if focused {
        theme::accent_bold()
    } else {
        theme::text()
    };
    let arrows = if focused { theme::accent() } else { theme::muted() };
    vec![
        Span::styled(format!(" {label}: "), theme::muted()),
        Span::styled("‹ ", arrows),
        Span::styled(value.unwrap_or("-").to_string(), value_style),
        Span::styled(" ›", arrows),
    ]
}
