//! TUI effects boundary: event loop, terminal lifecycle, key mapping.
//!
//! It wires the pure layers (state, update, view) to the real terminal
//! via crossterm and ratatui, and supplies the [`Host`] the effect
//! interpreter runs against.
//!
//! Architecture: producer threads feed a single mpsc channel.
//! - Key reader thread: forwards crossterm key presses and pastes
//! - Draw ticker: sends `Tick` while a draw is cycling
//! - Deferred grouping: sends `GroupingReady` once per request
//!
//! The event loop consumes from the channel, dispatching to pure handlers.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::ExecutableCommand;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info};

use crate::clipboard::ClipboardHandler;
use crate::schedule::{Deferred, Ticker};

use super::effect::{Host, apply_effect};
use super::state::{Action, App, AppEvent, Transition};
use super::update::{handle_background_event, update};
use super::view::render;

// ============================================================================
// KEY MAPPING
// ============================================================================

/// Map a crossterm key event to a semantic Action.
///
/// While a prompt is open (`typing`), printable keys become text.
/// Returns None for keys that don't map to any action.
pub fn map_key(key: KeyEvent, typing: bool) -> Option<Action> {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if typing {
        return match key.code {
            KeyCode::Enter => Some(Action::Enter),
            KeyCode::Esc => Some(Action::Back),
            KeyCode::Backspace => Some(Action::Backspace),
            KeyCode::Char(c) => Some(Action::Char(c)),
            _ => None,
        };
    }

    match key.code {
        // Navigation
        KeyCode::Up | KeyCode::Char('k') => Some(Action::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::MoveDown),
        KeyCode::Enter => Some(Action::Enter),
        KeyCode::Esc => Some(Action::Back),
        KeyCode::Tab => Some(Action::NextTab),
        KeyCode::Char(c @ '1'..='3') => Some(Action::NumberKey(c as u8 - b'0')),

        // Names
        KeyCode::Char('i') => Some(Action::Insert),
        KeyCode::Char('o') => Some(Action::Import),
        KeyCode::Char('d') | KeyCode::Delete => Some(Action::Remove),
        KeyCode::Char('u') => Some(Action::Dedupe),
        KeyCode::Char('X') => Some(Action::Clear),
        KeyCode::Char('s') => Some(Action::Sample),

        // Draw
        KeyCode::Char(' ') => Some(Action::Toggle),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('m') => Some(Action::ToggleRepeat),

        // Confirm
        KeyCode::Char('Y') | KeyCode::Char('y') => Some(Action::ConfirmYes),
        KeyCode::Char('N') | KeyCode::Char('n') => Some(Action::ConfirmNo),

        // Groups
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => Some(Action::Increase),
        KeyCode::Char('-') | KeyCode::Left => Some(Action::Decrease),
        KeyCode::Char('g') => Some(Action::Generate),
        KeyCode::Char('c') => Some(Action::Copy),
        KeyCode::Char('e') => Some(Action::Export),

        KeyCode::Char('q') => Some(Action::Quit),

        _ => None,
    }
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

/// Set up the terminal for TUI mode.
fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    // Pasted text must arrive as one event, not as key presses
    stdout.execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(DisableBracketedPaste)?;
    stdout.execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Best-effort terminal restoration
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// BACKGROUND PRODUCERS
// ============================================================================

/// Spawn a thread that reads crossterm events and forwards key presses
/// and pastes.
fn spawn_key_reader(tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        loop {
            match event::read() {
                // Release/repeat events would double every keystroke on
                // terminals that report them.
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(AppEvent::Key(key)).is_err() {
                        break; // receiver dropped, TUI is shutting down
                    }
                }
                Ok(Event::Paste(text)) => {
                    if tx.send(AppEvent::Paste(text)).is_err() {
                        break;
                    }
                }
                Ok(_) => {} // ignore mouse, resize, etc.
                Err(_) => break,
            }
        }
    });
}

/// Host backed by real threads and the system clipboard.
struct TerminalHost {
    tx: mpsc::Sender<AppEvent>,
    clipboard: ClipboardHandler,
}

impl Host for TerminalHost {
    fn start_ticker(&mut self, period: Duration) -> Ticker {
        let tx = self.tx.clone();
        Ticker::spawn(period, move || tx.send(AppEvent::Tick).is_ok())
    }

    fn schedule_grouping(&mut self, delay: Duration, ticket: u64) -> Deferred {
        let tx = self.tx.clone();
        Deferred::spawn(delay, move || {
            // Best-effort: if the receiver is gone the TUI has exited
            let _ = tx.send(AppEvent::GroupingReady { ticket });
        })
    }

    fn copy_text(&mut self, text: &str) -> Result<(), String> {
        self.clipboard.set_text(text)
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the TUI event loop until the user quits.
///
/// This is the main entry point for the TUI. It sets up the terminal,
/// starts the key reader, and dispatches events until quit. Timers still
/// running at exit are cancelled before the terminal is restored.
pub fn run(mut app: App) -> io::Result<()> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let mut rng = rand::rng();

    let (tx, rx) = mpsc::channel::<AppEvent>();
    spawn_key_reader(tx.clone());

    let mut host = TerminalHost {
        tx,
        clipboard: ClipboardHandler::new(),
    };

    info!(names = app.roster.len(), "tui started");

    loop {
        terminal.draw(|frame| render(&app, frame))?;

        if app.should_quit {
            break;
        }

        // Block on next event from any producer
        let event = match rx.recv() {
            Ok(e) => e,
            Err(_) => break, // all senders dropped
        };

        match event {
            AppEvent::Key(key) => {
                if let Some(action) = map_key(key, app.screen.is_typing()) {
                    dispatch(&mut app, &action, &mut host, &mut rng);
                }
            }
            AppEvent::Paste(text) => {
                dispatch(&mut app, &Action::Paste(text), &mut host, &mut rng);
            }
            background_event => {
                handle_background_event(&mut app, background_event, &mut rng);
            }
        }
    }

    app.draw.shutdown();
    app.grouping.cancel();
    info!("tui stopped");

    restore_terminal()?;
    Ok(())
}

/// Run one action through the pure transition and apply its outcome.
pub fn dispatch<H, R>(app: &mut App, action: &Action, host: &mut H, rng: &mut R)
where
    H: Host + ?Sized,
    R: rand::Rng + ?Sized,
{
    let screen = std::mem::take(&mut app.screen);
    match update(screen, action, app) {
        Transition::Screen(new_screen) => {
            app.screen = new_screen;
        }
        Transition::Quit => {
            app.should_quit = true;
        }
        Transition::Effect(new_screen, effect) => {
            debug!(?effect, "applying effect");
            app.screen = new_screen;
            apply_effect(app, effect, host, rng);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
