//! Bounded Variable Addition
//!
//! Finds sets of literals L and clauses C such that every combination of
//! l ∈ L with the non-seed part of c ∈ C appears in the formula, and
//! replaces the |L|·|C| matched clauses by |L| + |C| clauses over a fresh
//! auxiliary variable. The matching set is grown greedily from one seed
//! literal at a time, highest occurrence count first; no global optimality
//! is claimed.

use crate::{
    clause::ClauseRef,
    formula::Formula,
    literal::{literal_array_len, Literal},
    output::unreachable,
    schedule::Schedule,
};
use std::collections::BTreeMap;

/// The iteration ceiling used when none is configured.
pub const DEFAULT_ITERATION_LIMIT: usize = 10_000_000;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The scheduler ran out of valid entries.
    Drained,
    /// The iteration ceiling cut the run short.
    IterationLimit,
}

/// Candidate literals mapped to the clauses that support them
type CandidateMap = BTreeMap<Literal, Vec<ClauseRef>>;

/// The clause-count saving of replacing an `n_lit` × `n_cls` pattern by
/// `n_lit + n_cls` rewritten clauses plus one auxiliary variable.
///
/// Can be negative, hence the signed result.
pub fn reduction(n_lit: usize, n_cls: usize) -> i64 {
    let n = n_lit as i64;
    let m = n_cls as i64;
    n * m - n - m
}

/// The matching set grown for one seed literal
struct Matching {
    seed: Literal,
    /// M_lit: the literals factored together, seed included
    literals: Vec<Literal>,
    /// M_cls: the clauses containing the seed that fit the pattern
    clauses: Vec<ClauseRef>,
}

impl Matching {
    fn new(formula: &Formula, seed: Literal) -> Matching {
        Matching {
            seed,
            literals: vec![seed],
            clauses: formula.occurrences(seed).to_vec(),
        }
    }
    /// The acceptance test: adding `literal` must strictly improve the
    /// reduction, and the improved reduction must be positive.
    fn accepts(&self, literal: Literal, supported: usize) -> bool {
        let old = reduction(self.literals.len(), self.clauses.len());
        let grown = self.literals.len() + !self.literals.contains(&literal) as usize;
        let new = reduction(grown, supported);
        new > old && new > 0
    }
    fn accept(&mut self, literal: Literal, clauses: Vec<ClauseRef>) {
        if !self.literals.contains(&literal) {
            self.literals.push(literal);
        }
        self.clauses = clauses;
    }
}

/// Result of one growth round
#[derive(Debug, PartialEq, Eq)]
enum Growth {
    Accepted,
    Fixpoint,
}

/// Run the algorithm on `formula` until the scheduler drains or the
/// iteration ceiling is reached.
///
/// The occurrence index is rebuilt from the live clauses first, and the
/// scheduler is seeded with every literal that occurs at all. The ceiling
/// is consulted once per seed, so a ceiling of 0 leaves the formula
/// completely unchanged.
pub fn apply(formula: &mut Formula, max_iterations: usize) -> Outcome {
    formula.rebuild_occurrence_index();
    let mut schedule = Schedule::new();
    for encoding in 2..literal_array_len(formula.maximum_variable()) {
        let literal = Literal::from_raw(encoding as u32);
        let count = formula.occurrence_count(literal);
        if count > 0 {
            schedule.push(literal, count);
        }
    }
    let mut iteration = 0;
    loop {
        iteration += 1;
        if iteration > max_iterations {
            return Outcome::IterationLimit;
        }
        let seed = {
            let formula = &*formula;
            match schedule.pop_valid(|literal| formula.occurrence_count(literal)) {
                None => return Outcome::Drained,
                Some((literal, _count)) => literal,
            }
        };
        factor_seed(formula, &mut schedule, seed);
    }
}

/// Grow a matching set from `seed` and commit the rewrite if profitable.
fn factor_seed(formula: &mut Formula, schedule: &mut Schedule, seed: Literal) {
    if formula.occurrence_count(seed) == 0 {
        return;
    }
    let mut matching = Matching::new(formula, seed);
    while grow(formula, &mut matching) == Growth::Accepted {}
    if matching.literals.len() == 1 {
        return;
    }
    commit(formula, schedule, &matching);
    formula.check_occurrence_consistency();
}

/// One growth round: collect candidates, select the best, test acceptance.
fn grow(formula: &mut Formula, matching: &mut Matching) -> Growth {
    let mut candidates = CandidateMap::new();
    for index in 0..matching.clauses.len() {
        let c = matching.clauses[index];
        if formula.is_unary(c) {
            continue;
        }
        // Any clause matching c elsewhere must contain c's least occurring
        // literal, so scanning that literal's occurrence list is enough.
        let l_min = formula.least_occurring(c, matching.seed);
        for occurrence in 0..formula.occurrence_count(l_min) {
            let d = formula.occurrences(l_min)[occurrence];
            if formula.single_literal_difference(c, d) != Some(matching.seed) {
                continue;
            }
            let candidate = formula
                .single_literal_difference(d, c)
                .unwrap_or_else(|| unreachable());
            candidates.entry(candidate).or_insert_with(Vec::new).push(c);
        }
    }
    if candidates.is_empty() {
        return Growth::Fixpoint;
    }
    let l_max = select(formula, &candidates);
    let supported = candidates[&l_max].len();
    if !matching.accepts(l_max, supported) {
        return Growth::Fixpoint;
    }
    let clauses = candidates.remove(&l_max).unwrap_or_else(|| unreachable());
    matching.accept(l_max, clauses);
    Growth::Accepted
}

/// The candidate with the greatest live occurrence count.
fn select(formula: &Formula, candidates: &CandidateMap) -> Literal {
    requires!(!candidates.is_empty());
    candidates
        .keys()
        .cloned()
        .max_by_key(|&literal| (formula.occurrence_count(literal), literal))
        .unwrap_or_else(|| unreachable())
}

/// Rewrite the store: one fresh variable, |M_lit| + |M_cls| new clauses,
/// |M_lit| × |M_cls| retracted ones.
fn commit(formula: &mut Formula, schedule: &mut Schedule, matching: &Matching) {
    let x = formula.introduce_variable();
    let positive = x.literal();
    let negative = -positive;
    let mut rewritten: Vec<Literal> = Vec::new();
    for &literal in &matching.literals {
        formula.insert(&[literal, positive], false);
        for &c in &matching.clauses {
            rewritten.clear();
            rewritten.push(literal);
            rewritten.extend(
                formula
                    .literals(c)
                    .iter()
                    .cloned()
                    .filter(|&other| other != matching.seed),
            );
            formula.retract(&rewritten);
        }
    }
    for &c in &matching.clauses {
        rewritten.clear();
        rewritten.push(negative);
        rewritten.extend(
            formula
                .literals(c)
                .iter()
                .cloned()
                .filter(|&other| other != matching.seed),
        );
        formula.insert(&rewritten, false);
    }
    // Only these three are rescheduled eagerly; every other literal whose
    // count changed resurfaces through staleness detection alone.
    schedule.push(matching.seed, formula.occurrence_count(matching.seed));
    schedule.push(negative, formula.occurrence_count(negative));
    schedule.push(positive, formula.occurrence_count(positive));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Variable;
    use crate::memory::Offset;

    fn formula_from(clauses: &[&[i32]]) -> Formula {
        let mut formula = Formula::new();
        for clause in clauses {
            let literals: Vec<Literal> = clause.iter().cloned().map(Literal::new).collect();
            formula.insert(&literals, true);
        }
        formula
    }

    fn clause_sets(formula: &Formula) -> Vec<Vec<i32>> {
        let mut result: Vec<Vec<i32>> = formula
            .live_clauses()
            .map(|clause| {
                let mut literals: Vec<i32> =
                    formula.literals(clause).iter().map(|l| l.decode()).collect();
                literals.sort();
                literals
            })
            .collect();
        result.sort();
        result
    }

    /// Evaluate a clause set under an assignment given as a bitmask over
    /// variables 1..=maxvar (bit v-1 set means variable v is true).
    fn satisfies(clauses: &[Vec<i32>], assignment: usize) -> bool {
        clauses.iter().all(|clause| {
            clause.iter().any(|&literal| {
                let value = assignment >> (literal.abs() as usize - 1) & 1 != 0;
                if literal > 0 {
                    value
                } else {
                    !value
                }
            })
        })
    }

    #[test]
    fn reduction_is_signed() {
        assert_eq!(reduction(1, 3), -1);
        assert_eq!(reduction(2, 2), 0);
        assert_eq!(reduction(2, 3), 1);
        assert_eq!(reduction(3, 4), 5);
        assert_eq!(reduction(0, 0), 0);
        assert_eq!(reduction(1, 1), -1);
    }

    #[test]
    fn acceptance_matches_the_reduction_formula() {
        let formula = formula_from(&[&[1, 2], &[1, 3], &[1, 4]]);
        let seed = Literal::new(1);
        let mut matching = Matching::new(&formula, seed);
        // Hand-built candidate supports: accept only on strict improvement
        // over reduction(1, 3) = -1, and only if positive.
        assert!(matching.accepts(Literal::new(5), 3)); // reduction(2,3) = 1
        assert!(!matching.accepts(Literal::new(5), 2)); // reduction(2,2) = 0
        assert!(!matching.accepts(Literal::new(5), 1)); // reduction(2,1) = -1
        matching.accept(Literal::new(5), matching.clauses.clone());
        // Re-accepting a literal already in M_lit cannot improve.
        assert!(!matching.accepts(Literal::new(5), 3));
        assert!(matching.accepts(Literal::new(6), 3)); // reduction(3,3) = 3
    }

    #[test]
    fn factors_the_textbook_pattern() {
        // {1,2},{1,3},{1,4},{5,2},{5,3},{5,4} factors into 5 clauses
        // over one auxiliary variable.
        let mut formula = formula_from(&[
            &[1, 2],
            &[1, 3],
            &[1, 4],
            &[5, 2],
            &[5, 3],
            &[5, 4],
        ]);
        let before = clause_sets(&formula);
        assert_eq!(apply(&mut formula, DEFAULT_ITERATION_LIMIT), Outcome::Drained);
        assert_eq!(formula.maximum_variable(), Variable(6));
        assert_eq!(formula.stats.auxiliary_variables, 1);
        assert_eq!(formula.number_of_live_clauses(), 5);
        let after = clause_sets(&formula);
        assert_eq!(
            after,
            vec![
                vec![-6, 2],
                vec![-6, 3],
                vec![-6, 4],
                vec![1, 6],
                vec![5, 6],
            ]
        );
        // Equisatisfiability: projecting any model of the output onto
        // variables 1..5 satisfies the input, and any model of the input
        // extends to the output by choosing the auxiliary variable.
        for assignment in 0..1usize << 5 {
            let extends = satisfies(&after, assignment) || satisfies(&after, assignment | 1 << 5);
            assert_eq!(satisfies(&before, assignment), extends);
        }
        for assignment in 0..1usize << 6 {
            if satisfies(&after, assignment) {
                assert!(satisfies(&before, assignment & !(1 << 5)));
            }
        }
    }

    #[test]
    fn rejects_unprofitable_patterns() {
        // The only available pattern is 2x2; reduction stays at 0.
        let mut formula = formula_from(&[&[1, 2], &[1, 3], &[4, 2], &[4, 3]]);
        let before = clause_sets(&formula);
        let added = formula.stats.added;
        assert_eq!(apply(&mut formula, DEFAULT_ITERATION_LIMIT), Outcome::Drained);
        assert_eq!(formula.stats.added, added);
        assert_eq!(formula.stats.deleted, 0);
        assert_eq!(formula.stats.auxiliary_variables, 0);
        assert_eq!(clause_sets(&formula), before);
    }

    #[test]
    fn iteration_ceiling_of_zero_changes_nothing() {
        let mut formula = formula_from(&[
            &[1, 2],
            &[1, 3],
            &[1, 4],
            &[5, 2],
            &[5, 3],
            &[5, 4],
        ]);
        let before = clause_sets(&formula);
        assert_eq!(apply(&mut formula, 0), Outcome::IterationLimit);
        assert_eq!(clause_sets(&formula), before);
        assert_eq!(formula.stats.auxiliary_variables, 0);
    }

    #[test]
    fn unit_clauses_are_not_factored() {
        let mut formula = formula_from(&[&[1], &[1, 2], &[1, 3], &[5, 2], &[5, 3]]);
        apply(&mut formula, DEFAULT_ITERATION_LIMIT);
        // The unit clause {1} must survive untouched.
        assert!(clause_sets(&formula).contains(&vec![1]));
    }

    #[test]
    fn only_seed_and_auxiliary_are_rescheduled_after_commit() {
        // Documented behavior: literals 2, 3, 4 lose occurrences in the
        // commit but are not re-pushed; their stale entries are discarded
        // when popped, so they resurface lazily or not at all.
        let mut formula = formula_from(&[
            &[1, 2],
            &[1, 3],
            &[1, 4],
            &[5, 2],
            &[5, 3],
            &[5, 4],
        ]);
        formula.rebuild_occurrence_index();
        let mut schedule = Schedule::new();
        for encoding in 2..literal_array_len(formula.maximum_variable()) {
            let literal = Literal::from_raw(encoding as u32);
            let count = formula.occurrence_count(literal);
            if count > 0 {
                schedule.push(literal, count);
            }
        }
        let seed = {
            let formula = &formula;
            schedule
                .pop_valid(|literal| formula.occurrence_count(literal))
                .unwrap()
                .0
        };
        assert_eq!(seed, Literal::new(5));
        factor_seed(&mut formula, &mut schedule, seed);
        let mut valid = Vec::new();
        loop {
            let popped = {
                let formula = &formula;
                schedule.pop_valid(|literal| formula.occurrence_count(literal))
            };
            match popped {
                None => break,
                Some((literal, _count)) => valid.push(literal),
            }
        }
        // Everything except the three eagerly re-pushed literals is stale.
        assert_eq!(
            valid,
            vec![Literal::new(-6), Literal::new(6), Literal::new(5)]
        );
    }

    #[test]
    fn seeds_without_occurrences_are_skipped() {
        let mut formula = formula_from(&[&[1, 2]]);
        formula.rebuild_occurrence_index();
        let mut schedule = Schedule::new();
        factor_seed(&mut formula, &mut schedule, Literal::new(-1));
        assert_eq!(formula.number_of_live_clauses(), 1);
        assert!(schedule.is_empty());
    }

    #[test]
    fn dense_literal_iteration_covers_both_polarities() {
        let formula = formula_from(&[&[1, -2]]);
        let mut seen = Vec::new();
        for encoding in 2..literal_array_len(formula.maximum_variable()) {
            seen.push(Literal::from_raw(encoding as u32).decode());
        }
        assert_eq!(seen, vec![1, -1, 2, -2]);
        assert_eq!(Literal::new(-2).as_offset(), 5);
    }
}
