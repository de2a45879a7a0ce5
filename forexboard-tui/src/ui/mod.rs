//! Top-level UI layout: selector bar, trade table, pagination, status bar.

pub mod chart_panel;
pub mod overlays;
pub mod pagination_bar;
pub mod selector_bar;
pub mod status_bar;
pub mod trade_table;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::Frame;

use crate::app::{AppState, Overlay};

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    selector_bar::render(f, chunks[0], app);

    if app.chart_visible {
        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        trade_table::render(f, halves[0], app);
        chart_panel::render(f, halves[1], app);
    } else {
        trade_table::render(f, chunks[1], app);
    }

    pagination_bar::render(f, chunks[2], app);
    status_bar::render(f, chunks[3], app);

    // Draw overlays on top.
    let main_area = chunks[1];
    match app.overlay {
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::Detail(idx) => overlays::render_detail(f, main_area, app, idx),
        Overlay::None => {}
    }
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
