//! TUI module for the interactive terminal interface.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (App, Screen, Action, Transition, Effect)
//! - `update`: Pure transitions
//! - `view`: Pure rendering
//! - `effect`: Effect interpretation against a [`effect::Host`]
//! - `run`: Terminal, threads, and the event loop

pub mod effect;
pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;
