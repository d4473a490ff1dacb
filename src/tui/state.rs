//! TUI state algebra: pure types, zero effects.
//!
//! Screen variants carry only per-screen transient state (cursor, scroll,
//! text being typed). Shared data (the roster and both engines) lives in
//! [`App`], which the effects layer mutates and the view reads.

use std::path::PathBuf;

use crossterm::event::KeyEvent;

use crate::draw::DrawEngine;
use crate::grouping::GroupingSession;
use crate::roster::Roster;
use crate::types::Settings;

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the event loop can receive from its channel.
///
/// Three producers feed a single mpsc channel:
/// - The key reader thread sends `Key` and `Paste`
/// - The draw ticker sends `Tick` while a draw is cycling
/// - The deferred grouping task sends `GroupingReady`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A terminal key event from the crossterm reader thread.
    Key(KeyEvent),
    /// Bracketed paste: the whole pasted text in one event.
    Paste(String),
    /// Cycling animation tick.
    Tick,
    /// The grouping delay for `ticket` has elapsed.
    GroupingReady { ticket: u64 },
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Top-level TUI model.
///
/// Owns the roster and both engines for the whole session.
#[derive(Debug)]
pub struct App {
    /// Current screen with its navigation state.
    pub screen: Screen,

    /// The name list, lent to both engines.
    pub roster: Roster,

    pub draw: DrawEngine,

    pub grouping: GroupingSession,

    pub settings: Settings,

    /// Outcome of the last effect, shown above the help line.
    pub status: Option<Status>,

    /// Set to true when the app should exit on the next tick.
    pub should_quit: bool,
}

/// One-line feedback after an effect runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Warning,
    Error,
}

// ============================================================================
// SCREENS
// ============================================================================

/// The current TUI screen, one per tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Name list management.
    Names {
        /// Focused row index.
        cursor: usize,
        /// Text prompt, when one is open.
        input: Option<Input>,
    },

    /// Prize draw. Engine state lives in [`App::draw`].
    Draw,

    /// Grouping results.
    Groups {
        /// Index of the first group shown.
        scroll: usize,
    },
}

/// Default screen is the name list (used as placeholder during transitions).
impl Default for Screen {
    fn default() -> Self {
        Screen::names()
    }
}

/// A text prompt on the Names screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub kind: InputKind,
    pub buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Names separated by commas.
    Names,
    /// Path of a CSV file to import.
    CsvPath,
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user action, decoupled from raw key events.
///
/// The effects layer maps key presses to Actions.
/// The transition function decides what each Action means per Screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    Enter,
    Back,
    /// Jump to tab 1-3.
    NumberKey(u8),
    NextTab,
    /// A printable character while a prompt is open.
    Char(char),
    /// Pasted text, newlines included.
    Paste(String),
    Backspace,
    /// Open the "add names" prompt.
    Insert,
    /// Open the "import CSV" prompt.
    Import,
    /// Remove the focused name.
    Remove,
    Dedupe,
    /// Clear the whole list (capital X: deliberate).
    Clear,
    /// Append the built-in sample roster.
    Sample,
    /// Start or stop the draw.
    Toggle,
    /// Arm, or confirm, clearing the winner history.
    Reset,
    ConfirmYes,
    ConfirmNo,
    ToggleRepeat,
    Increase,
    Decrease,
    Generate,
    Copy,
    Export,
    Quit,
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure state transition.
///
/// Follows the Elm/TEA pattern: pure code describes WHAT should happen,
/// effectful code decides HOW.
#[derive(Debug, PartialEq)]
pub enum Transition {
    /// Render this screen (may be the same or a different screen).
    Screen(Screen),
    /// Quit the application.
    Quit,
    /// Render this screen and execute a side effect.
    Effect(Screen, Effect),
}

/// Side effect requested by a pure transition.
///
/// Pure code never executes these; the effects layer interprets them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Split bulk text and append the names.
    AddText(String),
    AddSample,
    ImportCsv(PathBuf),
    RemoveName(usize),
    Dedupe,
    ClearNames,
    StartDraw,
    StopDraw,
    Reset,
    CancelReset,
    ToggleRepeat,
    SetGroupSize(usize),
    GenerateGroups,
    CopyGroups,
    ExportCsv,
}

// ============================================================================
// CONSTRUCTORS
// ============================================================================

impl App {
    /// Fresh session: empty roster, engines configured from `settings`.
    pub fn new(settings: Settings) -> Self {
        App {
            screen: Screen::names(),
            roster: Roster::new(),
            draw: DrawEngine::new(settings.allow_repeat),
            grouping: GroupingSession::new(settings.group_size),
            settings,
            status: None,
            should_quit: false,
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Info, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Warning, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.set_status(StatusKind::Error, text);
    }

    fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }
}

impl Screen {
    /// Names screen with cursor at top and no prompt.
    pub fn names() -> Self {
        Screen::Names {
            cursor: 0,
            input: None,
        }
    }

    pub fn groups() -> Self {
        Screen::Groups { scroll: 0 }
    }

    /// True while a text prompt captures the keyboard.
    pub fn is_typing(&self) -> bool {
        matches!(self, Screen::Names { input: Some(_), .. })
    }

    /// 1-based tab number, for the tab bar.
    pub fn tab(&self) -> u8 {
        match self {
            Screen::Names { .. } => 1,
            Screen::Draw => 2,
            Screen::Groups { .. } => 3,
        }
    }
}

impl Input {
    pub fn new(kind: InputKind) -> Self {
        Input {
            kind,
            buffer: String::new(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_starts_on_names_with_empty_roster() {
        let app = App::new(Settings::default());
        assert_eq!(app.screen, Screen::names());
        assert!(app.roster.is_empty());
        assert!(app.status.is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn app_engines_follow_settings() {
        let settings = Settings {
            group_size: 3,
            allow_repeat: true,
            ..Default::default()
        };
        let app = App::new(settings);
        assert!(app.draw.allow_repeat());
        assert_eq!(app.grouping.group_size(), 3);
    }

    #[test]
    fn screen_default_is_names() {
        assert_eq!(Screen::default(), Screen::names());
    }

    #[test]
    fn typing_only_with_open_prompt() {
        assert!(!Screen::names().is_typing());
        assert!(!Screen::Draw.is_typing());
        let screen = Screen::Names {
            cursor: 0,
            input: Some(Input::new(InputKind::Names)),
        };
        assert!(screen.is_typing());
    }

    #[test]
    fn tabs_are_numbered_in_order() {
        assert_eq!(Screen::names().tab(), 1);
        assert_eq!(Screen::Draw.tab(), 2);
        assert_eq!(Screen::groups().tab(), 3);
    }

    #[test]
    fn status_helpers_set_kind() {
        let mut app = App::new(Settings::default());
        app.warn("careful");
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Warning));
        app.error("broken");
        assert_eq!(
            app.status,
            Some(Status {
                kind: StatusKind::Error,
                text: "broken".into()
            })
        );
    }
}
