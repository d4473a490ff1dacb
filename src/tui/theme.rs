//! TUI color semantics and style constants.
//!
//! Pure data, consumed by the rendering layer for visual consistency.
//!
//! Color semantics:
//! - Green: winners, success messages
//! - Yellow: warnings, duplicate markers, pending actions
//! - Red: errors, destructive confirmations
//! - Cyan: interactive elements (keybinding hints, active tab)
//! - Dim: de-emphasized (indices, placeholders)
//! - Bold: important (the drawn name, group labels)

use ratatui::style::{Color, Modifier, Style};

use super::state::StatusKind;

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Success / winner, green.
pub const STYLE_SUCCESS: Style = Style::new().fg(Color::Green);

/// Warning / attention needed, yellow.
pub const STYLE_WARNING: Style = Style::new().fg(Color::Yellow);

/// Error / destructive, red.
pub const STYLE_DANGER: Style = Style::new().fg(Color::Red);

/// Interactive element / keybinding hint, cyan.
pub const STYLE_INTERACTIVE: Style = Style::new().fg(Color::Cyan);

/// De-emphasized metadata, dark gray.
pub const STYLE_DIM: Style = Style::new().fg(Color::DarkGray);

pub const STYLE_IMPORTANT: Style = Style::new().add_modifier(Modifier::BOLD);

// ============================================================================
// UI ELEMENT STYLES
// ============================================================================

/// Title bar / header.
pub const STYLE_TITLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

/// The tab the user is on.
pub const STYLE_TAB_ACTIVE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);

pub const STYLE_TAB_INACTIVE: Style = Style::new().fg(Color::DarkGray);

/// Cursor row in a list.
pub const STYLE_CURSOR: Style = Style::new().add_modifier(Modifier::REVERSED);

/// The name on display while a draw cycles.
pub const STYLE_CYCLING: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// The name on display once a winner is settled.
pub const STYLE_WINNER: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Footer / help line.
pub const STYLE_HELP: Style = Style::new().fg(Color::DarkGray);

/// Style for a status line of the given kind.
pub fn status_style(kind: StatusKind) -> Style {
    match kind {
        StatusKind::Info => STYLE_SUCCESS,
        StatusKind::Warning => STYLE_WARNING,
        StatusKind::Error => STYLE_DANGER,
    }
}

// ============================================================================
// TESTS
// ============================================================================
