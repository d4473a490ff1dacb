//! teamdraw: manage a name list, run a prize draw, split people into random groups.

pub mod clipboard;
pub mod config;
pub mod draw;
pub mod error;
pub mod export;
pub mod grouping;
pub mod ingest;
pub mod logging;
pub mod roster;
pub mod schedule;
pub mod tui;
pub mod types;
