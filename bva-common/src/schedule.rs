//! Lazy-priority literal scheduler

use crate::literal::Literal;
use std::collections::BinaryHeap;

/// An occurrence-count snapshot for one literal
///
/// An entry records the occurrence count at push time. Counts change while
/// the entry sits in the heap; instead of updating entries in place, the
/// scheduler discards entries whose snapshot went stale when they surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Entry {
    /// The occurrence count at the time of the push
    expected: usize,
    /// The scheduled literal (doubles as deterministic tiebreak)
    literal: Literal,
}

impl Entry {
    pub fn new(literal: Literal, expected: usize) -> Entry {
        Entry { literal, expected }
    }
    /// Whether the snapshot still matches the live occurrence count.
    pub fn is_valid(self, current_count: usize) -> bool {
        self.expected == current_count
    }
}

/// Max-priority structure over (occurrence count, literal) pairs
///
/// Entries are never removed when a count decreases; staleness is detected
/// on pop. This trades possibly-redundant entries for O(1) updates, which
/// is fine because the growth algorithm dominates the runtime, not
/// scheduling.
#[derive(Debug, Default)]
pub struct Schedule {
    heap: BinaryHeap<Entry>,
}

impl Schedule {
    pub fn new() -> Schedule {
        Schedule::default()
    }
    /// Schedule a literal with its current occurrence count.
    pub fn push(&mut self, literal: Literal, count: usize) {
        self.heap.push(Entry::new(literal, count));
    }
    /// Pop the highest-priority literal whose entry is still valid.
    ///
    /// Stale entries encountered on the way are discarded. Returns the
    /// literal and its occurrence count, or None if the heap ran empty.
    pub fn pop_valid(&mut self, current_count: impl Fn(Literal) -> usize) -> Option<(Literal, usize)> {
        while let Some(entry) = self.heap.pop() {
            if entry.is_valid(current_count(entry.literal)) {
                return Some((entry.literal, entry.expected));
            }
        }
        None
    }
    /// The number of entries, including stale ones.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_validity() {
        let entry = Entry::new(Literal::new(5), 3);
        assert!(entry.is_valid(3));
        assert!(!entry.is_valid(2));
        assert!(!entry.is_valid(4));
    }

    #[test]
    fn pops_highest_count_first() {
        let mut schedule = Schedule::new();
        schedule.push(Literal::new(1), 2);
        schedule.push(Literal::new(-2), 5);
        schedule.push(Literal::new(3), 4);
        let counts = |lit: Literal| match lit.decode() {
            1 => 2,
            -2 => 5,
            3 => 4,
            _ => 0,
        };
        assert_eq!(schedule.pop_valid(counts), Some((Literal::new(-2), 5)));
        assert_eq!(schedule.pop_valid(counts), Some((Literal::new(3), 4)));
        assert_eq!(schedule.pop_valid(counts), Some((Literal::new(1), 2)));
        assert_eq!(schedule.pop_valid(counts), None);
    }

    #[test]
    fn discards_stale_entries() {
        let mut schedule = Schedule::new();
        schedule.push(Literal::new(1), 7);
        schedule.push(Literal::new(2), 3);
        // Literal 1's occurrence list shrank after the push.
        let counts = |lit: Literal| match lit.decode() {
            1 => 6,
            2 => 3,
            _ => 0,
        };
        assert_eq!(schedule.pop_valid(counts), Some((Literal::new(2), 3)));
        assert!(schedule.is_empty());
    }
}
