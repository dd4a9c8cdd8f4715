//! Per-literal occurrence lists

use crate::{
    clause::{ClauseArena, ClauseRef},
    literal::{literal_array_len, Literal, Variable},
    memory::{Array, HeapSpace},
};

/// For every literal, the live clauses currently containing it
///
/// Lists hold clause handles, not owning references; consistency with the
/// clause store is maintained by calling [record](#method.record) exactly
/// once when a clause is created and [retract](#method.retract) exactly
/// once when it is deleted.
#[derive(Debug)]
pub struct OccurrenceIndex {
    table: Array<Literal, Vec<ClauseRef>>,
}

impl OccurrenceIndex {
    pub fn new() -> OccurrenceIndex {
        OccurrenceIndex {
            table: Array::new(Vec::new(), 2),
        }
    }
    /// Make sure there are lists for both polarities of every variable up
    /// to `maxvar`.
    pub fn enlarge(&mut self, maxvar: Variable) {
        let required = literal_array_len(maxvar);
        if required > self.table.size() {
            self.table.resize(required, Vec::new());
        }
    }
    /// The list of live clauses containing `literal`.
    pub fn occurrences(&self, literal: Literal) -> &[ClauseRef] {
        &self.table[literal]
    }
    /// The length of the occurrence list of `literal`.
    pub fn count(&self, literal: Literal) -> usize {
        self.table[literal].len()
    }
    /// Append the clause to the list of every literal it contains.
    pub fn record(&mut self, clause: ClauseRef, literals: &[Literal]) {
        for &literal in literals {
            self.table[literal].push(clause);
        }
    }
    /// Remove the clause from the list of every literal it contains,
    /// compacting each list in place.
    pub fn retract(&mut self, clause: ClauseRef, literals: &[Literal]) {
        for &literal in literals {
            self.table[literal].retain(|&other| other != clause);
        }
    }
    /// Drop all lists and re-record every live clause in the arena.
    pub fn rebuild(&mut self, arena: &ClauseArena) {
        for list in self.table.iter_mut() {
            list.clear();
        }
        for clause in arena.live_clauses() {
            for &literal in arena.literals(clause) {
                self.table[literal].push(clause);
            }
        }
    }
}

impl HeapSpace for OccurrenceIndex {
    fn heap_space(&self) -> usize {
        self.table.heap_space()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(clause: &[i32]) -> Vec<Literal> {
        clause.iter().cloned().map(Literal::new).collect()
    }

    #[test]
    fn record_and_retract_keep_lists_exact() {
        let mut arena = ClauseArena::new();
        let mut index = OccurrenceIndex::new();
        index.enlarge(Variable(3));
        let c = arena.alloc(&lits(&[1, -2]));
        let d = arena.alloc(&lits(&[1, 3]));
        index.record(c, arena.literals(c));
        index.record(d, arena.literals(d));
        assert_eq!(index.occurrences(Literal::new(1)), &[c, d]);
        assert_eq!(index.count(Literal::new(-2)), 1);
        assert_eq!(index.count(Literal::new(2)), 0);
        index.retract(c, arena.literals(c));
        assert_eq!(index.occurrences(Literal::new(1)), &[d]);
        assert_eq!(index.count(Literal::new(-2)), 0);
    }

    #[test]
    fn rebuild_skips_deleted_clauses() {
        let mut arena = ClauseArena::new();
        let mut index = OccurrenceIndex::new();
        index.enlarge(Variable(2));
        let c = arena.alloc(&lits(&[1, 2]));
        let d = arena.alloc(&lits(&[-1, 2]));
        arena.delete(c);
        index.rebuild(&arena);
        assert_eq!(index.count(Literal::new(1)), 0);
        assert_eq!(index.occurrences(Literal::new(2)), &[d]);
        assert_eq!(index.occurrences(Literal::new(-1)), &[d]);
    }
}
