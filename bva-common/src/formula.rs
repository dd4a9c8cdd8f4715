//! The deduplicated clause store and its indices

use crate::{
    clause::{ClauseArena, ClauseRef},
    config,
    hashtable::DedupTable,
    literal::{literal_array_len, Literal, Variable},
    marks::Marks,
    memory::HeapSpace,
    occurrence::OccurrenceIndex,
    proof::{NullTracer, ProofTracer},
};

/// Running counters, pure observability state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    /// Clauses added to the store, input clauses included
    pub added: usize,
    /// Clauses retracted from the store
    pub deleted: usize,
    /// Auxiliary variables introduced by factoring
    pub auxiliary_variables: usize,
    /// Tautological input clauses that were dropped
    pub tautologies: usize,
}

/// A CNF formula under preprocessing
///
/// Owns the clause arena and keeps the dedup table and the occurrence
/// index consistent with it: the store never holds two clauses with equal
/// content, and a clause absent from the store has no surviving
/// occurrence-list entries.
pub struct Formula {
    arena: ClauseArena,
    table: DedupTable,
    occurrence: OccurrenceIndex,
    marks: Marks,
    max_var: Variable,
    tracer: Box<dyn ProofTracer>,
    pub stats: Statistics,
}

impl Formula {
    pub fn new() -> Formula {
        Formula::with_tracer(Box::new(NullTracer))
    }
    /// Create a formula whose mutations are reported to `tracer`.
    pub fn with_tracer(tracer: Box<dyn ProofTracer>) -> Formula {
        Formula {
            arena: ClauseArena::new(),
            table: DedupTable::new(),
            occurrence: OccurrenceIndex::new(),
            marks: Marks::new(),
            max_var: Variable(0),
            tracer,
            stats: Statistics::default(),
        }
    }

    /// The highest variable seen so far; grows monotonically.
    pub fn maximum_variable(&self) -> Variable {
        self.max_var
    }
    /// Raise the variable bound, growing marks and occurrence storage.
    pub fn declare_maximum_variable(&mut self, variable: Variable) {
        if variable > self.max_var {
            self.max_var = variable;
        }
        self.marks.enlarge(self.max_var);
        self.occurrence.enlarge(self.max_var);
    }
    /// Allocate a fresh auxiliary variable.
    pub fn introduce_variable(&mut self) -> Variable {
        let variable = Variable(self.max_var.0 + 1);
        self.declare_maximum_variable(variable);
        self.stats.auxiliary_variables += 1;
        variable
    }

    /// Insert a clause unless an equal one is already live.
    ///
    /// Returns the handle and whether the clause was new. On a new clause
    /// the occurrence index is updated and the proof tracer notified;
    /// `original` marks clauses coming from the input formula.
    pub fn insert(&mut self, literals: &[Literal], original: bool) -> (ClauseRef, bool) {
        requires!(!literals.is_empty());
        for &literal in literals {
            requires!(!literal.is_zero());
            let variable = literal.variable();
            if variable > self.max_var {
                self.declare_maximum_variable(variable);
            }
        }
        if let Some(existing) =
            self.table
                .find_equal_clause(literals, &self.arena, &mut self.marks, false)
        {
            return (existing, false);
        }
        let clause = self.arena.alloc(literals);
        self.table.add_clause(clause, &self.arena);
        self.occurrence.record(clause, literals);
        self.tracer.notify_added(literals, original);
        self.stats.added += 1;
        (clause, true)
    }

    /// Retract the clause whose content equals `literals`, if any.
    ///
    /// The clause is flagged deleted first and its arena storage survives,
    /// so occurrence compaction never sees a dangling handle.
    pub fn retract(&mut self, literals: &[Literal]) -> bool {
        let found = self
            .table
            .find_equal_clause(literals, &self.arena, &mut self.marks, true);
        match found {
            None => false,
            Some(clause) => {
                self.arena.delete(clause);
                let Formula {
                    arena,
                    occurrence,
                    tracer,
                    ..
                } = self;
                occurrence.retract(clause, arena.literals(clause));
                tracer.notify_deleted(arena.literals(clause));
                self.stats.deleted += 1;
                true
            }
        }
    }

    /// Whether the clause has exactly one literal.
    ///
    /// Unit clauses are never candidates for factoring.
    pub fn is_unary(&self, clause: ClauseRef) -> bool {
        self.arena.length(clause) == 1
    }
    /// The literals of a clause (valid also for retracted clauses).
    pub fn literals(&self, clause: ClauseRef) -> &[Literal] {
        self.arena.literals(clause)
    }
    /// The live clauses containing `literal`.
    pub fn occurrences(&self, literal: Literal) -> &[ClauseRef] {
        self.occurrence.occurrences(literal)
    }
    /// The length of the occurrence list of `literal`.
    pub fn occurrence_count(&self, literal: Literal) -> usize {
        self.occurrence.count(literal)
    }
    /// Iterate over the handles of all live clauses.
    pub fn live_clauses(&self) -> impl Iterator<Item = ClauseRef> + '_ {
        self.arena.live_clauses()
    }
    /// The number of live clauses.
    pub fn number_of_live_clauses(&self) -> usize {
        self.stats.added - self.stats.deleted
    }
    /// Rebuild the occurrence index from the live clauses.
    pub fn rebuild_occurrence_index(&mut self) {
        self.occurrence.rebuild(&self.arena);
    }
    /// Forward a comment to the proof tracer.
    pub fn trace_comment(&mut self, text: &str) {
        self.tracer.notify_comment(text);
    }

    /// Expensive consistency check of the occurrence lists, compiled to a
    /// no-op unless enabled in the configuration.
    pub fn check_occurrence_consistency(&self) {
        if !config::CHECK_OCCURRENCE_INVARIANTS {
            return;
        }
        let mut recorded = 0;
        for encoding in 2..literal_array_len(self.max_var) {
            let literal = Literal::from_raw(encoding as u32);
            for &clause in self.occurrence.occurrences(literal) {
                invariant!(self.arena.is_live(clause));
                invariant!(self.arena.literals(clause).contains(&literal));
            }
            recorded += self.occurrence.count(literal);
        }
        let expected: usize = self
            .live_clauses()
            .map(|clause| self.arena.length(clause))
            .sum();
        invariant!(recorded == expected);
    }

    /// The literal of `c` that is not in `d`, if the clauses have equal
    /// length and differ in exactly one literal.
    pub fn single_literal_difference(&mut self, c: ClauseRef, d: ClauseRef) -> Option<Literal> {
        let Formula { arena, marks, .. } = self;
        if arena.length(c) != arena.length(d) {
            return None;
        }
        let mut lease = marks.lease();
        for &literal in arena.literals(d) {
            lease.mark(literal);
        }
        let mut difference = None;
        let mut count = 0;
        for &literal in arena.literals(c) {
            if lease.sign(literal) > 0 {
                continue;
            }
            count += 1;
            difference = Some(literal);
        }
        if count == 1 {
            difference
        } else {
            None
        }
    }

    /// The least-occurring literal of `clause` other than `other`.
    ///
    /// Ties go to the later literal. The clause must contain at least one
    /// literal besides `other`.
    pub fn least_occurring(&self, clause: ClauseRef, other: Literal) -> Literal {
        requires!(self.arena.length(clause) >= 2);
        let mut result = None;
        let mut result_count = usize::max_value();
        for &literal in self.arena.literals(clause) {
            if literal == other {
                continue;
            }
            let count = self.occurrence.count(literal);
            invariant!(count >= 1);
            if count > result_count {
                continue;
            }
            result = Some(literal);
            result_count = count;
        }
        result.unwrap_or_else(|| crate::output::unreachable())
    }
}

impl Formula {
    /// Heap usage of the individual components, for diagnostics.
    pub fn memory_breakdown(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("arena", self.arena.heap_space()),
            ("dedup-table", self.table.heap_space()),
            ("occurrence-index", self.occurrence.heap_space()),
            ("marks", self.marks.heap_space()),
        ]
    }
}

impl Default for Formula {
    fn default() -> Formula {
        Formula::new()
    }
}

impl HeapSpace for Formula {
    fn heap_space(&self) -> usize {
        self.arena.heap_space()
            + self.table.heap_space()
            + self.occurrence.heap_space()
            + self.marks.heap_space()
    }
}
