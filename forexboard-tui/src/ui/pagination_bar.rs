//! One-line pagination controls under the table.

use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use forexboard_core::PageControl;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let controls = app.session.controls();
    if controls.is_empty() {
        return;
    }
    let para = Paragraph::new(pagination_line(&controls)).alignment(Alignment::Center);
    f.render_widget(para, area);
}

/// `« ‹ 1 2 … [4] … 7 › »` with disabled controls muted.
pub fn pagination_line(controls: &[PageControl]) -> Line<'static> {
    let mut spans = Vec::with_capacity(controls.len() * 2);
    for (i, control) in controls.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let span = match control {
            PageControl::Page { active: true, .. } => {
                Span::styled(format!("[{}]", control.label()), theme::accent_bold())
            }
            PageControl::Ellipsis => Span::styled(control.label(), theme::muted()),
            c if !c.is_enabled() => Span::styled(control.label(), theme::muted()),
            _ => Span::styled(control.label(), theme::text()),
        };
        spans.push(span);
    }
    Line::from(spans)
}
