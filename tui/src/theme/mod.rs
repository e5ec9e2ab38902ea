//! Theme and Colors
//!
//! The doomsday palette: burnt orange phosphor on black, with a red for
//! warnings and a few embers for the visual panel.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Terminal Phosphor
// ============================================================================

/// Main terminal text - burnt orange
pub const TERMINAL_ORANGE: Color = Color::Rgb(234, 88, 12);

/// Dimmed terminal text (hints, separators)
pub const TERMINAL_DIM: Color = Color::Rgb(124, 45, 18);

/// Screen background
pub const BACKGROUND: Color = Color::Black;

/// Inline errors
pub const ERROR_RED: Color = Color::Rgb(239, 68, 68);

// ============================================================================
// Visual Panel
// ============================================================================

/// Mushroom cloud core
pub const EMBER_YELLOW: Color = Color::Rgb(253, 186, 116);

/// Mushroom cloud rim
pub const EMBER_RED: Color = Color::Rgb(194, 65, 12);

/// Ground / smoke
pub const ASH_GRAY: Color = Color::Rgb(68, 64, 60);

// ============================================================================
// Styles
// ============================================================================

/// Style for typed terminal text
pub fn text_style() -> Style {
    Style::default().fg(TERMINAL_ORANGE).bg(BACKGROUND)
}

/// Style for the block cursor
pub fn cursor_style() -> Style {
    Style::default()
        .fg(TERMINAL_ORANGE)
        .add_modifier(Modifier::SLOW_BLINK)
}

/// Style for the Start control
pub fn button_style() -> Style {
    Style::default()
        .fg(BACKGROUND)
        .bg(TERMINAL_ORANGE)
        .add_modifier(Modifier::BOLD)
}

/// Style for inline errors
pub fn error_style() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Style for hints and the status line
pub fn dim_style() -> Style {
    Style::default().fg(TERMINAL_DIM)
}
