//! Domain types for teamdraw.
//!
//! Shared between the engines, the exporters and the presentation layer.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ============================================================================
// PRIMITIVES
// ============================================================================

/// One group of a partition: member names in shuffled order.
pub type Group = Vec<String>;

/// Placeholder shown by the draw engine before anyone has been drawn.
pub const PLACEHOLDER: &str = "???";

/// A numbered group as it appears in machine-readable exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// 1-based group number.
    pub group: usize,
    /// Members in draw order.
    pub members: Vec<String>,
}

// ============================================================================
// ENUMS
// ============================================================================

/// Phases of the prize draw state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPhase {
    /// Nothing drawn since the last reset.
    #[default]
    Idle,
    /// Names are flashing by; no winner is committed yet.
    Cycling,
    /// A draw was stopped. The displayed name is the last winner, if any.
    Settled,
}

/// Output format for a group set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// The clipboard layout: `第 n 组:` blocks separated by blank lines.
    #[default]
    Text,
    /// Spreadsheet-friendly CSV with a byte-order mark.
    Csv,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Session settings.
///
/// Every field has a default so a partial settings file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Members per group for the grouping engine.
    pub group_size: usize,
    /// Whether a previous winner may be drawn again.
    pub allow_repeat: bool,
    /// Period of the cosmetic cycling tick, in milliseconds.
    pub tick_interval_ms: u64,
    /// Delay before a requested grouping is produced, in milliseconds.
    pub grouping_delay_ms: u64,
    /// Directory the CSV export is written to.
    pub export_dir: PathBuf,
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn grouping_delay(&self) -> Duration {
        Duration::from_millis(self.grouping_delay_ms)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            group_size: 4,
            allow_repeat: false,
            tick_interval_ms: 50,
            grouping_delay_ms: 600,
            export_dir: PathBuf::from("."),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
