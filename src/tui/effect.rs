//! Effect interpretation: the one place where transitions touch the
//! roster, the engines, the filesystem, and the clipboard.
//!
//! Anything that needs a thread or the OS goes through [`Host`], so the
//! interpreter runs against a fake host in tests.

use std::path::Path;
use std::time::Duration;

use rand::Rng;
use tracing::warn;

use crate::export::{to_clipboard_text, write_csv};
use crate::ingest::{read_csv_file, split_bulk_text};
use crate::roster::SAMPLE_NAMES;
use crate::schedule::{Deferred, Ticker};

use super::state::{App, Effect, Screen};

/// Side-effect capabilities supplied by the event loop.
pub trait Host {
    /// Start a ticker that feeds `Tick` events every `period`.
    fn start_ticker(&mut self, period: Duration) -> Ticker;

    /// Deliver `GroupingReady { ticket }` after `delay`.
    fn schedule_grouping(&mut self, delay: Duration, ticket: u64) -> Deferred;

    fn copy_text(&mut self, text: &str) -> Result<(), String>;
}

/// Execute one effect against the app.
pub fn apply_effect<H, R>(app: &mut App, effect: Effect, host: &mut H, rng: &mut R)
where
    H: Host + ?Sized,
    R: Rng + ?Sized,
{
    match effect {
        Effect::AddText(text) => {
            let added = app.roster.add(split_bulk_text(&text));
            if added == 0 {
                app.warn("No names in input");
            } else {
                app.info(format!("Added {} name{}", added, plural(added)));
            }
        }
        Effect::AddSample => {
            let added = app.roster.add(SAMPLE_NAMES);
            app.info(format!("Added {} sample names", added));
        }
        Effect::ImportCsv(path) => import_csv(app, &path),
        Effect::RemoveName(index) => {
            if let Some(name) = app.roster.remove_at(index) {
                app.info(format!("Removed {}", name));
            }
        }
        Effect::Dedupe => {
            let removed = app.roster.dedupe();
            app.info(format!("Removed {} duplicate{}", removed, plural(removed)));
        }
        Effect::ClearNames => {
            app.roster.clear();
            app.info("Name list cleared");
        }
        Effect::StartDraw => {
            let period = app.settings.tick_interval();
            if app.draw.start(app.roster.names(), || host.start_ticker(period)) {
                app.status = None;
            } else {
                app.warn("No eligible names to draw");
            }
        }
        Effect::StopDraw => match app.draw.stop(app.roster.names(), rng) {
            Some(winner) => app.info(format!("Winner: {}", winner)),
            None => app.warn("No eligible names left"),
        },
        Effect::Reset => {
            if app.draw.reset() {
                app.info("Winner history cleared");
            } else {
                app.warn("Press r or y again to clear the winner history");
            }
        }
        Effect::CancelReset => {
            app.draw.cancel_reset();
            app.status = None;
        }
        Effect::ToggleRepeat => {
            let allow = !app.draw.allow_repeat();
            app.draw.set_allow_repeat(allow);
            app.settings.allow_repeat = allow;
            app.info(if allow {
                "Repeat winners allowed"
            } else {
                "Each name wins at most once"
            });
        }
        Effect::SetGroupSize(size) => {
            app.grouping.set_group_size(size);
            app.settings.group_size = app.grouping.group_size();
        }
        Effect::GenerateGroups => {
            let delay = app.settings.grouping_delay();
            let ticket = app
                .grouping
                .request(app.roster.names(), |ticket| host.schedule_grouping(delay, ticket));
            if ticket.is_some() {
                app.info("Generating...");
            } else {
                app.warn("Add some names first");
            }
        }
        Effect::CopyGroups => {
            let text = to_clipboard_text(app.grouping.groups());
            match host.copy_text(&text) {
                Ok(()) => app.info("Groups copied to clipboard"),
                Err(e) => {
                    warn!(error = %e, "clipboard write failed");
                    app.error(e);
                }
            }
        }
        Effect::ExportCsv => {
            let dir = app.settings.export_dir.clone();
            match write_csv(app.grouping.groups(), &dir) {
                Ok(path) => app.info(format!("Exported to {}", path.display())),
                Err(e) => app.error(format!("Export failed: {}", e)),
            }
        }
    }

    clamp_cursor(app);
}

fn import_csv(app: &mut App, path: &Path) {
    match read_csv_file(path) {
        Ok(entries) => {
            let added = app.roster.add(entries);
            app.info(format!("Imported {} name{}", added, plural(added)));
        }
        // The list is left as it was on any failure.
        Err(e) => app.error(format!("Import failed: {}", e)),
    }
}

/// Keep the Names cursor on a real row after the list shrinks.
fn clamp_cursor(app: &mut App) {
    let len = app.roster.len();
    if let Screen::Names { cursor, .. } = &mut app.screen {
        *cursor = (*cursor).min(len.saturating_sub(1));
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

// ============================================================================
// TESTS
// ============================================================================
