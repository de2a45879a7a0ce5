//! Price levels of the current page: entry, target and stop per signal.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use forexboard_core::view::row_number;
use forexboard_core::TradeSignal;

use crate::app::AppState;
use crate::theme::{self, Theme};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(false))
        .title(" Price Levels ")
        .title_style(theme::panel_title(false));

    let signals = app.signals();
    if signals.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled("Nothing to plot.", theme::muted())),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    }

    let first = row_number(app.session.selection().page(), 0);
    render_chart(f, area, block, signals, first as f64);
}

/// `(x, y)` series for one price level, x being the running row number.
pub fn series(
    signals: &[TradeSignal],
    first: f64,
    level: fn(&TradeSignal) -> f64,
) -> Vec<(f64, f64)> {
    signals
        .iter()
        .enumerate()
        .map(|(i, s)| (first + i as f64, level(s)))
        .collect()
}

fn render_chart(f: &mut Frame, area: Rect, block: Block, signals: &[TradeSignal], first: f64) {
    let palette = Theme::default();

    let entry = series(signals, first, |s| s.entry_price);
    let target = series(signals, first, |s| s.target);
    let stop = series(signals, first, |s| s.stop_loss);

    let (min_y, max_y) = entry
        .iter()
        .chain(&target)
        .chain(&stop)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
            (lo.min(y), hi.max(y))
        });
    let padding = ((max_y - min_y).abs() * 0.05).max(1e-4);
    let y_min = min_y - padding;
    let y_max = max_y + padding;
    let x_max = first + signals.len().saturating_sub(1) as f64;

    let datasets = vec![
        Dataset::default()
            .name("entry")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(theme::ACCENT))
            .graph_type(GraphType::Line)
            .data(&entry),
        Dataset::default()
            .name("target")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(palette.positive))
            .graph_type(GraphType::Line)
            .data(&target),
        Dataset::default()
            .name("stop")
            .marker(symbols::Marker::Braille)
            .style(Style::default().fg(palette.negative))
            .graph_type(GraphType::Line)
            .data(&stop),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Signal #", theme::muted()))
                .style(theme::muted())
                .bounds([first, x_max.max(first + 1.0)])
                .labels(vec![
                    Span::styled(format!("{first:.0}"), theme::muted()),
                    Span::styled(format!("{x_max:.0}"), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Price", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.4}"), theme::muted()),
                    Span::styled(format!("{y_max:.4}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}
