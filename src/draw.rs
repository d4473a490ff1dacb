//! Prize draw engine.
//!
//! State machine `Idle -> Cycling -> Settled -> Cycling ...`. While
//! cycling, a ticker flashes random eligible names (cosmetic only); the
//! winner is sampled independently when the draw is stopped.
//!
//! The engine never stores the name list. Every operation that needs it
//! borrows the roster's names, so the eligible pool is always computed
//! from the current list.

use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::schedule::Ticker;
use crate::types::{DrawPhase, PLACEHOLDER};

/// Names that may be drawn next.
///
/// With repeats allowed this is the whole list. Otherwise every value
/// that appears in `winners` is excluded, including all its copies.
pub fn eligible_pool<'a>(names: &'a [String], winners: &[String], allow_repeat: bool) -> Vec<&'a str> {
    names
        .iter()
        .filter(|name| allow_repeat || !winners.contains(*name))
        .map(String::as_str)
        .collect()
}

/// Draw engine state. Owns the winner history and the cycling ticker.
#[derive(Debug, Default)]
pub struct DrawEngine {
    phase: DrawPhase,
    /// Name on display; `None` shows the placeholder.
    displayed: Option<String>,
    /// Most recent first.
    winners: Vec<String>,
    allow_repeat: bool,
    reset_armed: bool,
    ticker: Option<Ticker>,
}

impl DrawEngine {
    pub fn new(allow_repeat: bool) -> Self {
        DrawEngine {
            allow_repeat,
            ..Default::default()
        }
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    pub fn is_cycling(&self) -> bool {
        self.phase == DrawPhase::Cycling
    }

    /// The name currently shown, or the placeholder.
    pub fn displayed(&self) -> &str {
        self.displayed.as_deref().unwrap_or(PLACEHOLDER)
    }

    /// Winner history, most recent first.
    pub fn winners(&self) -> &[String] {
        &self.winners
    }

    pub fn allow_repeat(&self) -> bool {
        self.allow_repeat
    }

    pub fn is_reset_armed(&self) -> bool {
        self.reset_armed
    }

    pub fn eligible<'a>(&self, names: &'a [String]) -> Vec<&'a str> {
        eligible_pool(names, &self.winners, self.allow_repeat)
    }

    /// Takes effect on the next pool computation; history is untouched.
    pub fn set_allow_repeat(&mut self, allow_repeat: bool) {
        self.allow_repeat = allow_repeat;
    }

    // ========================================================================
    // TRANSITIONS
    // ========================================================================

    /// Enter `Cycling`, acquiring a ticker from `schedule`.
    ///
    /// Returns false (and never calls `schedule`) when the pool is empty
    /// or a draw is already cycling.
    pub fn start(&mut self, names: &[String], schedule: impl FnOnce() -> Ticker) -> bool {
        if self.is_cycling() {
            return false;
        }
        if self.eligible(names).is_empty() {
            debug!("draw not started: no eligible names");
            return false;
        }
        self.ticker = Some(schedule());
        self.phase = DrawPhase::Cycling;
        true
    }

    /// Flash one random eligible name. Ignored unless cycling.
    pub fn tick<R: Rng + ?Sized>(&mut self, names: &[String], rng: &mut R) -> bool {
        if !self.is_cycling() {
            return false;
        }
        match self.eligible(names).choose(rng) {
            Some(name) => {
                self.displayed = Some((*name).to_string());
                true
            }
            None => false,
        }
    }

    /// Stop cycling and commit a winner.
    ///
    /// Returns the winner, or `None` when not cycling or the pool emptied
    /// while cycling (the display is then left as it was).
    pub fn stop<R: Rng + ?Sized>(&mut self, names: &[String], rng: &mut R) -> Option<String> {
        if !self.is_cycling() {
            return None;
        }
        self.release_ticker();
        self.phase = DrawPhase::Settled;

        let winner = self.eligible(names).choose(rng).map(|name| (*name).to_string())?;
        info!(winner = %winner, draws = self.winners.len() + 1, "winner drawn");
        self.displayed = Some(winner.clone());
        self.winners.insert(0, winner.clone());
        Some(winner)
    }

    /// Two-step reset. The first call arms; the second clears history,
    /// restores the placeholder and returns to `Idle`.
    ///
    /// Returns true when the reset was committed.
    pub fn reset(&mut self) -> bool {
        if !self.reset_armed {
            self.reset_armed = true;
            return false;
        }
        self.release_ticker();
        self.reset_armed = false;
        self.winners.clear();
        self.displayed = None;
        self.phase = DrawPhase::Idle;
        info!("draw history cleared");
        true
    }

    pub fn cancel_reset(&mut self) {
        self.reset_armed = false;
    }

    /// Release the ticker on teardown. Later calls are harmless.
    pub fn shutdown(&mut self) {
        self.release_ticker();
        if self.is_cycling() {
            self.phase = DrawPhase::Settled;
        }
    }

    fn release_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            if ticker.cancel() {
                debug!("cycling ticker released");
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
