//! Content-addressed clause lookup

use crate::{
    clause::{ClauseArena, ClauseRef},
    literal::Literal,
    marks::Marks,
    memory::{HeapSpace, Offset},
};

/// A hash table with a fixed size, mapping clause contents to handles
///
/// This works like the one in `drat-trim`: the hash is order-independent,
/// so permutations of the same literals land in the same bucket, and the
/// bucket scan decides equality by looking at the literals — handle
/// identity is never enough, since two distinct clause objects can carry
/// the same content.
pub struct DedupTable(Vec<Vec<ClauseRef>>);

/// Return the hash bucket to which this clause belongs.
fn bucket_index(clause: &[Literal]) -> usize {
    clause_hash(clause) % DedupTable::SIZE
}

impl DedupTable {
    /// The number of buckets (`drat-trim` uses a million; a preprocessor
    /// sees only one formula, so fewer suffice)
    const SIZE: usize = 1 << 16;
    /// The initial size of each bucket.
    const BUCKET_INITIAL_SIZE: usize = 4;
    /// Allocate the hash table.
    #[allow(clippy::new_without_default)]
    pub fn new() -> DedupTable {
        DedupTable(vec![
            Vec::with_capacity(DedupTable::BUCKET_INITIAL_SIZE);
            DedupTable::SIZE
        ])
    }
    /// Register a clause that is known not to be a duplicate.
    pub fn add_clause(&mut self, clause: ClauseRef, arena: &ClauseArena) {
        self.0[bucket_index(arena.literals(clause))].push(clause);
    }
    /// Find the stored clause whose content equals `needle`.
    ///
    /// If delete is true, remove the found clause from the table.
    pub fn find_equal_clause(
        &mut self,
        needle: &[Literal],
        arena: &ClauseArena,
        marks: &mut Marks,
        delete: bool,
    ) -> Option<ClauseRef> {
        let bucket = &mut self.0[bucket_index(needle)];
        for offset in 0..bucket.len() {
            let clause = bucket[offset];
            invariant!(arena.is_live(clause));
            if clauses_identical(needle, arena.literals(clause), marks) {
                if delete {
                    bucket.swap_remove(offset);
                }
                return Some(clause);
            }
        }
        None
    }
}

impl HeapSpace for DedupTable {
    fn heap_space(&self) -> usize {
        self.0.heap_space()
    }
}

/// Multiset equality of two duplicate-free clauses, via scratch marks.
pub fn clauses_identical(c: &[Literal], d: &[Literal], marks: &mut Marks) -> bool {
    if c.len() != d.len() {
        return false;
    }
    let mut lease = marks.lease();
    for &literal in c {
        lease.mark(literal);
    }
    d.iter().all(|&literal| lease.sign(literal) > 0)
}

/// Compute the hash of a clause. This is the same hash function `drat-trim`
/// uses; it is invariant under permutation of the literals.
pub fn clause_hash(clause: &[Literal]) -> usize {
    let mut sum: usize = 0;
    let mut prod: usize = 1;
    let mut xor: usize = 0;
    for &literal in clause {
        prod = prod.wrapping_mul(literal.as_offset());
        sum = sum.wrapping_add(literal.as_offset());
        xor ^= literal.as_offset();
    }
    (1023_usize.wrapping_mul(sum).wrapping_add(prod)) ^ (31_usize.wrapping_mul(xor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Variable;

    fn lits(clause: &[i32]) -> Vec<Literal> {
        clause.iter().cloned().map(Literal::new).collect()
    }

    fn marks_for(maxvar: u32) -> Marks {
        let mut marks = Marks::new();
        marks.enlarge(Variable(maxvar));
        marks
    }

    #[test]
    fn hash_is_order_independent() {
        assert_eq!(clause_hash(&lits(&[1, -2, 3])), clause_hash(&lits(&[3, 1, -2])));
        assert_ne!(clause_hash(&lits(&[1, 2])), clause_hash(&lits(&[1, -2])));
    }

    #[test]
    fn equality_is_multiset_equality() {
        let mut marks = marks_for(4);
        assert!(clauses_identical(&lits(&[1, -2, 4]), &lits(&[4, 1, -2]), &mut marks));
        assert!(!clauses_identical(&lits(&[1, 2]), &lits(&[1, -2]), &mut marks));
        assert!(!clauses_identical(&lits(&[1, 2]), &lits(&[1, 2, 3]), &mut marks));
        // The lease must have cleaned up after each call.
        assert_eq!(marks.sign(Literal::new(1)), 0);
    }

    #[test]
    fn finds_permuted_clause_and_deletes_it() {
        let mut arena = ClauseArena::new();
        let mut marks = marks_for(3);
        let mut table = DedupTable::new();
        let c = arena.alloc(&lits(&[1, 2, -3]));
        table.add_clause(c, &arena);
        let found = table.find_equal_clause(&lits(&[-3, 2, 1]), &arena, &mut marks, false);
        assert_eq!(found, Some(c));
        let deleted = table.find_equal_clause(&lits(&[2, 1, -3]), &arena, &mut marks, true);
        assert_eq!(deleted, Some(c));
        assert_eq!(
            table.find_equal_clause(&lits(&[1, 2, -3]), &arena, &mut marks, false),
            None
        );
    }
}
