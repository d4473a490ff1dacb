//! Random partition of the name list into fixed-size groups.
//!
//! [`group`] is the pure algorithm. [`GroupingSession`] wraps it with the
//! state the presentation layer needs: the configured size, the last
//! result, and a deferred request that a newer request always supersedes.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::schedule::Deferred;
use crate::types::Group;

/// Shuffle `names` uniformly, then cut into chunks of `group_size`.
///
/// The last group holds the remainder. Returns `None` for an empty list
/// or a group size of zero.
pub fn group<R: Rng + ?Sized>(names: &[String], group_size: usize, rng: &mut R) -> Option<Vec<Group>> {
    if names.is_empty() || group_size < 1 {
        return None;
    }
    let mut shuffled = names.to_vec();
    shuffled.shuffle(rng);
    Some(shuffled.chunks(group_size).map(<[String]>::to_vec).collect())
}

/// A grouping request waiting for its deferred callback.
#[derive(Debug)]
struct Pending {
    ticket: u64,
    /// Names as they were when the request was made.
    snapshot: Vec<String>,
    handle: Deferred,
}

/// Grouping state owned by the presentation layer.
#[derive(Debug)]
pub struct GroupingSession {
    group_size: usize,
    groups: Vec<Group>,
    pending: Option<Pending>,
    next_ticket: u64,
}

impl GroupingSession {
    pub fn new(group_size: usize) -> Self {
        GroupingSession {
            group_size: group_size.max(1),
            groups: Vec::new(),
            pending: None,
            next_ticket: 0,
        }
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    /// Set the group size. Values below one are raised to one.
    pub fn set_group_size(&mut self, group_size: usize) {
        self.group_size = group_size.max(1);
    }

    /// Result of the last completed grouping; empty until one completes.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// Queue a grouping of `names`.
    ///
    /// `schedule` receives the ticket to hand back to [`Self::complete`].
    /// Any earlier pending request is cancelled. Returns `None` (and keeps
    /// both the previous result and any pending request) when `names` is
    /// empty.
    pub fn request(&mut self, names: &[String], schedule: impl FnOnce(u64) -> Deferred) -> Option<u64> {
        if names.is_empty() {
            return None;
        }
        let ticket = self.next_ticket;
        self.next_ticket += 1;

        if let Some(previous) = self.pending.take() {
            previous.handle.cancel();
            debug!(superseded = previous.ticket, ticket, "grouping request superseded");
        }

        self.pending = Some(Pending {
            ticket,
            snapshot: names.to_vec(),
            handle: schedule(ticket),
        });
        Some(ticket)
    }

    /// Produce the groups for `ticket`.
    ///
    /// Stale tickets (superseded or cancelled) are ignored. Returns true
    /// when the result was replaced.
    pub fn complete<R: Rng + ?Sized>(&mut self, ticket: u64, rng: &mut R) -> bool {
        match self.pending.take() {
            Some(pending) if pending.ticket == ticket => self.apply(&pending.snapshot, rng),
            other => {
                self.pending = other;
                debug!(ticket, "stale grouping result ignored");
                false
            }
        }
    }

    /// Group immediately, without a deferred step.
    pub fn generate_now<R: Rng + ?Sized>(&mut self, names: &[String], rng: &mut R) -> bool {
        self.cancel();
        self.apply(names, rng)
    }

    /// Drop any pending request. The last result stays.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.cancel();
        }
    }

    fn apply<R: Rng + ?Sized>(&mut self, names: &[String], rng: &mut R) -> bool {
        match group(names, self.group_size, rng) {
            Some(groups) => {
                info!(names = names.len(), groups = groups.len(), size = self.group_size, "groups generated");
                self.groups = groups;
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
