//! Keyboard input dispatch: overlays → global keys → focus-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use forexboard_core::Nav;

use crate::app::{AppState, Focus, Overlay};

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.running = false;
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::Detail(_) => {
            handle_detail_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.focus = app.focus.prev();
            } else {
                app.focus = app.focus.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.focus = app.focus.prev();
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.error_scroll = 0;
            app.overlay = Overlay::ErrorHistory;
            return;
        }
        KeyCode::Char('c') => {
            app.chart_visible = !app.chart_visible;
            return;
        }
        KeyCode::Char('C') => {
            app.request_catalog();
            return;
        }
        KeyCode::Char('r') => {
            refresh(app);
            return;
        }
        KeyCode::Char('n') | KeyCode::PageDown => {
            navigate(app, Nav::Next);
            return;
        }
        KeyCode::Char('p') | KeyCode::PageUp => {
            navigate(app, Nav::Prev);
            return;
        }
        KeyCode::Home => {
            navigate(app, Nav::First);
            return;
        }
        KeyCode::End => {
            navigate(app, Nav::Last);
            return;
        }
        _ => {}
    }

    // 3. Focus-specific keys.
    match app.focus {
        Focus::Symbol => handle_selector_key(app, key, true),
        Focus::Timeframe => handle_selector_key(app, key, false),
        Focus::Trades => handle_trades_key(app, key),
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_detail_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
            app.overlay = Overlay::None;
        }
        // Step through rows without closing the overlay.
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_cursor(1);
            app.overlay = Overlay::Detail(app.cursor);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_cursor(-1);
            app.overlay = Overlay::Detail(app.cursor);
        }
        _ => {}
    }
}

fn handle_selector_key(app: &mut AppState, key: KeyEvent, symbol: bool) {
    let step = match key.code {
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('j') | KeyCode::Down => 1,
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('k') | KeyCode::Up => -1,
        KeyCode::Enter => {
            app.focus = Focus::Trades;
            return;
        }
        _ => return,
    };

    if !app.session.catalog_loaded() {
        app.set_warning("No symbols loaded (press C to retry)");
        return;
    }

    let ticket = if symbol {
        app.session.cycle_symbol(step)
    } else {
        app.session.cycle_timeframe(step)
    };
    app.dispatch(ticket);
}

fn handle_trades_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char('l') | KeyCode::Right => navigate(app, Nav::Next),
        KeyCode::Char('h') | KeyCode::Left => navigate(app, Nav::Prev),
        KeyCode::Char('g') => navigate(app, Nav::First),
        KeyCode::Char('G') => navigate(app, Nav::Last),
        KeyCode::Enter => {
            if app.cursor < app.signals().len() {
                app.overlay = Overlay::Detail(app.cursor);
            }
        }
        _ => {}
    }
}

fn navigate(app: &mut AppState, nav: Nav) {
    if let Some(ticket) = app.session.navigate(nav) {
        app.dispatch(Some(ticket));
    }
}

fn refresh(app: &mut AppState) {
    if !app.session.catalog_loaded() {
        app.request_catalog();
        return;
    }
    let ticket = app.session.refresh();
    app.dispatch(ticket);
}
