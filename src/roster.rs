//! The name list store.
//!
//! Single source of truth for both engines. Entries are always trimmed
//! and non-empty; duplicates are allowed and reported separately so the
//! presentation layer can flag them.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

/// Demo roster, loadable in one keystroke. Contains two duplicates on purpose.
pub const SAMPLE_NAMES: [&str; 12] = [
    "赵云", "关羽", "张飞", "马超", "黄忠", "魏延", "姜维", "诸葛亮", "庞统", "法正", "赵云", "关羽",
];

/// Ordered list of names. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    names: Vec<String>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from raw entries, normalizing them like [`Roster::add`].
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roster = Self::new();
        roster.add(entries);
        roster
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    // ========================================================================
    // MUTATIONS
    // ========================================================================

    /// Trim each entry, drop the ones that end up empty, append the rest.
    ///
    /// Returns how many names were appended.
    pub fn add<I, S>(&mut self, entries: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before = self.names.len();
        self.names.extend(
            entries
                .into_iter()
                .map(|entry| entry.as_ref().trim().to_string())
                .filter(|name| !name.is_empty()),
        );
        let added = self.names.len() - before;
        debug!(added, total = self.names.len(), "names added");
        added
    }

    /// Remove the name at `index`. Out of range is a no-op.
    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.names.len() {
            Some(self.names.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.names.clear();
    }

    /// Keep the first occurrence of every value, drop later copies.
    ///
    /// Returns how many entries were dropped.
    pub fn dedupe(&mut self) -> usize {
        let before = self.names.len();
        let mut seen = HashSet::new();
        self.names.retain(|name| seen.insert(name.clone()));
        let removed = before - self.names.len();
        if removed > 0 {
            debug!(removed, "duplicates removed");
        }
        removed
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Positions whose value already appeared at a lower index.
    pub fn duplicate_indices(&self) -> BTreeSet<usize> {
        let mut seen = HashSet::new();
        self.names
            .iter()
            .enumerate()
            .filter(|(_, name)| !seen.insert(name.as_str()))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn has_duplicates(&self) -> bool {
        let mut seen = HashSet::new();
        self.names.iter().any(|name| !seen.insert(name.as_str()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(names: &[&str]) -> Roster {
        Roster::from_entries(names.iter().copied())
    }

    // -- add --

    #[test]
    fn add_trims_and_discards_blank_entries() {
        let mut r = Roster::new();
        let added = r.add(["  Alice ", "", "   ", "\tBob\n", "Carol"]);
        assert_eq!(added, 3);
        assert_eq!(r.names(), ["Alice", "Bob", "Carol"]);
        assert!(r.names().iter().all(|n| !n.trim().is_empty()));
    }

    #[test]
    fn add_appends_after_existing_names() {
        let mut r = roster(&["A"]);
        r.add(["B", "A"]);
        assert_eq!(r.names(), ["A", "B", "A"]);
    }

    #[test]
    fn add_empty_input_is_noop() {
        let mut r = roster(&["A"]);
        assert_eq!(r.add(Vec::<String>::new()), 0);
        assert_eq!(r.len(), 1);
    }

    // -- remove_at --

    #[test]
    fn remove_at_keeps_relative_order() {
        let mut r = roster(&["A", "B", "C", "D"]);
        assert_eq!(r.remove_at(1), Some("B".to_string()));
        assert_eq!(r.names(), ["A", "C", "D"]);
    }

    #[test]
    fn remove_at_out_of_range_is_noop() {
        let mut r = roster(&["A", "B"]);
        assert_eq!(r.remove_at(2), None);
        assert_eq!(r.remove_at(usize::MAX), None);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn remove_at_on_empty_roster_is_noop() {
        let mut r = Roster::new();
        assert_eq!(r.remove_at(0), None);
    }

    // -- clear --

    #[test]
    fn clear_empties_the_list() {
        let mut r = roster(&["A", "B"]);
        r.clear();
        assert!(r.is_empty());
    }

    // -- dedupe --

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let mut r = roster(&["A", "B", "A", "C"]);
        assert_eq!(r.dedupe(), 1);
        assert_eq!(r.names(), ["A", "B", "C"]);
    }

    #[test]
    fn dedupe_is_idempotent() {
        let mut r = roster(&["B", "A", "B", "B", "C", "A"]);
        r.dedupe();
        let once = r.clone();
        assert_eq!(r.dedupe(), 0);
        assert_eq!(r, once);
        assert_eq!(r.names(), ["B", "A", "C"]);
    }

    #[test]
    fn dedupe_is_case_sensitive() {
        let mut r = roster(&["alice", "Alice"]);
        assert_eq!(r.dedupe(), 0);
    }

    // -- duplicate_indices --

    #[test]
    fn duplicate_indices_marks_later_copies_only() {
        let r = roster(&["A", "B", "A", "C", "B", "A"]);
        let dups: Vec<usize> = r.duplicate_indices().into_iter().collect();
        assert_eq!(dups, vec![2, 4, 5]);
        assert!(r.has_duplicates());
    }

    #[test]
    fn duplicate_indices_empty_for_unique_list() {
        let r = roster(&["A", "B", "C"]);
        assert!(r.duplicate_indices().is_empty());
        assert!(!r.has_duplicates());
    }

    #[test]
    fn sample_names_contain_two_duplicates() {
        let r = Roster::from_entries(SAMPLE_NAMES);
        assert_eq!(r.duplicate_indices().len(), 2);
    }
}
