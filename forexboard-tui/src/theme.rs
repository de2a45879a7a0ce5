//! Parrot/neon theme tokens for the ForexBoard TUI
//!
//! Provides a consistent color palette inspired by:
//! - Parrot color scheme (neon accents on dark background)
//! - Terminal aesthetic with high contrast
//!
//! # Color Palette
//! - **Accent**: Electric cyan (primary highlights, focus)
//! - **Positive**: Neon green (gains, buy signals)
//! - **Negative**: Hot pink (losses, sell signals, failures)
//! - **Warning**: Neon orange (alerts, stale data)
//! - **Neutral**: Cool purple (secondary info, neutral states)
//! - **Muted**: Steel blue (disabled, secondary text)

use ratatui::style::{Color, Modifier, Style};

use forexboard_core::SignalKind;

/// Parrot/neon theme for the ForexBoard TUI
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Electric cyan accent (focus, highlights)
    pub accent: Color,
    /// Neon green (positive values, gains, buy)
    pub positive: Color,
    /// Hot pink (negative values, losses, sell)
    pub negative: Color,
    /// Neon orange (warnings, alerts)
    pub warning: Color,
    /// Cool purple (neutral info, secondary)
    pub neutral: Color,
    /// Steel blue (muted text, disabled)
    pub muted: Color,
    /// White (primary text)
    pub text_primary: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    /// Create the default Parrot/neon theme
    pub const fn parrot_neon() -> Self {
        Self {
            accent: ACCENT,
            positive: Color::Rgb(0, 255, 128),
            negative: Color::Rgb(255, 20, 147),
            warning: Color::Rgb(255, 140, 0),
            neutral: Color::Rgb(147, 112, 219),
            muted: Color::Rgb(100, 149, 237),
            text_primary: Color::White,
        }
    }

    /// Get color for PnL value (positive = green, negative = pink)
    pub fn pnl_color(&self, value: f64) -> Color {
        if value >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    /// Get color for signal direction
    pub fn signal_color(&self, kind: SignalKind) -> Color {
        match kind {
            SignalKind::Buy => self.positive,
            SignalKind::Sell => self.negative,
        }
    }
}

/// Electric cyan.
pub const ACCENT: Color = Color::Rgb(0, 255, 255);

const THEME: Theme = Theme::parrot_neon();

pub fn accent() -> Style {
    Style::default().fg(THEME.accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn negative() -> Style {
    Style::default().fg(THEME.negative)
}

pub fn warning() -> Style {
    Style::default().fg(THEME.warning)
}

pub fn muted() -> Style {
    Style::default().fg(THEME.muted)
}

pub fn text() -> Style {
    Style::default().fg(THEME.text_primary)
}

pub fn signal(kind: SignalKind) -> Style {
    Style::default().fg(THEME.signal_color(kind))
}

pub fn pnl(value: f64) -> Style {
    Style::default().fg(THEME.pnl_color(value))
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
        assert_eq!(theme.text_primary, Color::White);
    }

    #[test]
    fn test_pnl_color() {
        let theme = Theme::default();
        assert_eq!(theme.pnl_color(100.0), theme.positive);
        assert_eq!(theme.pnl_color(-50.0), theme.negative);
        assert_eq!(theme.pnl_color(0.0), theme.positive);
    }

    #[test]
    fn test_signal_color() {
        let theme = Theme::default();
        assert_eq!(theme.signal_color(SignalKind::Buy), theme.positive);
        assert_eq!(theme.signal_color(SignalKind::Sell), theme.negative);
    }

    #[test]
    fn test_focus_styles() {
        assert_eq!(panel_border(true).fg, Some(ACCENT));
        assert_eq!(panel_border(false).fg, Some(THEME.muted));
        assert!(panel_title(true).add_modifier.contains(Modifier::BOLD));
    }
}
