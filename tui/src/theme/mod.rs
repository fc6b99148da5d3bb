//! Theme and Colors
//!
//! The ticker palette: magenta accents, bright digits, dim helper text.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Palette
// ============================================================================

/// Signature accent (titles, header)
pub const ACCENT_MAGENTA: Color = Color::Magenta;

/// Big digits
pub const DIGIT_WHITE: Color = Color::Rgb(235, 235, 235);

/// Unit labels above the digits
pub const LABEL_CORAL: Color = Color::Rgb(255, 150, 120);

/// Editable field text
pub const INPUT_GREEN: Color = Color::Rgb(130, 220, 130);

/// Instructions and hints
pub const DIM_GRAY: Color = Color::Rgb(120, 120, 120);

/// Validation messages
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

// ============================================================================
// Styles
// ============================================================================

pub fn header() -> Style {
    Style::default()
        .fg(ACCENT_MAGENTA)
        .add_modifier(Modifier::BOLD)
}

pub fn label() -> Style {
    Style::default().fg(LABEL_CORAL)
}

pub fn digits() -> Style {
    Style::default().fg(DIGIT_WHITE)
}

pub fn hint() -> Style {
    Style::default().fg(DIM_GRAY)
}

pub fn input() -> Style {
    Style::default().fg(INPUT_GREEN)
}

pub fn error() -> Style {
    Style::default().fg(ERROR_RED)
}
