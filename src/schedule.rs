//! Cancellable background timers.
//!
//! Two handle types, both backed by a plain thread and a shared flag:
//! - [`Ticker`]: runs a callback every `period` until cancelled
//! - [`Deferred`]: runs a callback once after `delay` unless cancelled
//!
//! Cancellation is idempotent and happens at the latest when the handle
//! is dropped, so no callback outlives its owner by more than one period.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Shared "stop now" flag between a handle and its thread.
#[derive(Debug, Clone)]
struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    fn new(cancelled: bool) -> Self {
        CancelFlag(Arc::new(AtomicBool::new(cancelled)))
    }

    /// Returns true only for the call that flipped the flag.
    fn cancel(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }

    fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

// ============================================================================
// TICKER
// ============================================================================

/// Handle to a repeating callback.
#[derive(Debug)]
pub struct Ticker {
    flag: CancelFlag,
}

impl Ticker {
    /// Start calling `on_tick` every `period`.
    ///
    /// The callback returns false to stop on its own (e.g. when the
    /// receiving side of a channel has gone away).
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let flag = CancelFlag::new(false);
        let thread_flag = flag.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(period);
                if thread_flag.is_cancelled() || !on_tick() {
                    break;
                }
            }
        });
        Ticker { flag }
    }

    /// A handle with no thread behind it. Used by headless draws and tests.
    pub fn inert() -> Self {
        Ticker {
            flag: CancelFlag::new(false),
        }
    }

    /// Stop the ticker. Returns true the first time only.
    pub fn cancel(&self) -> bool {
        self.flag.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.flag.cancel();
    }
}

// ============================================================================
// DEFERRED
// ============================================================================

/// Handle to a one-shot delayed callback.
#[derive(Debug)]
pub struct Deferred {
    flag: CancelFlag,
}

impl Deferred {
    /// Run `task` once after `delay`, unless cancelled first.
    pub fn spawn<F>(delay: Duration, task: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let flag = CancelFlag::new(false);
        let thread_flag = flag.clone();
        thread::spawn(move || {
            thread::sleep(delay);
            if !thread_flag.is_cancelled() {
                task();
            }
        });
        Deferred { flag }
    }

    /// A handle with no thread behind it.
    pub fn inert() -> Self {
        Deferred {
            flag: CancelFlag::new(false),
        }
    }

    /// Cancel the task. Returns true the first time only.
    pub fn cancel(&self) -> bool {
        self.flag.cancel()
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.is_cancelled()
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.flag.cancel();
    }
}

// ============================================================================
// TESTS
// ============================================================================
