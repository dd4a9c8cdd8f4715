//! Per-variable scratch marks
//!
//! A single signed slot per variable supports O(1) membership tests during
//! tautology checks, clause equality and single-literal-difference
//! computations. The slots must be all zero between any two such
//! operations; [MarkLease](struct.MarkLease.html) enforces that by
//! unmarking everything it marked when it goes out of scope, on every exit
//! path.

use crate::{
    literal::{Literal, Variable},
    memory::{Array, HeapSpace},
};

/// The scratch-mark array
#[derive(Debug)]
pub struct Marks {
    /// One slot per variable: -1, 0 or +1
    value: Array<Variable, i8>,
    /// The number of variable slots
    size: usize,
    /// Literals marked by the active lease, unmarked on lease drop
    trail: Vec<Literal>,
}

impl Marks {
    pub fn new() -> Marks {
        Marks {
            value: Array::new(0, 2),
            size: 2,
            trail: Vec::new(),
        }
    }
    /// Grow by doubling until there is a slot for `variable`.
    ///
    /// Growth preserves existing marks; it is the only mutation triggered
    /// by seeing a larger variable than before.
    pub fn enlarge(&mut self, variable: Variable) {
        use crate::memory::Offset;
        let mut new_size = self.size;
        while variable.as_offset() >= new_size {
            new_size *= 2;
        }
        if new_size != self.size {
            self.value.resize(new_size, 0);
            self.size = new_size;
        }
    }
    /// The sign with which this literal's variable is marked.
    ///
    /// Returns +1 if `literal` itself is marked, -1 if its negation is,
    /// and 0 if the variable is unmarked.
    pub fn sign(&self, literal: Literal) -> i8 {
        let value = self.value[literal.variable()];
        if literal.is_negative() {
            -value
        } else {
            value
        }
    }
    /// Start a scoped marking operation.
    pub fn lease(&mut self) -> MarkLease {
        invariant!(self.trail.is_empty());
        MarkLease { marks: self }
    }
}

impl HeapSpace for Marks {
    fn heap_space(&self) -> usize {
        self.value.heap_space() + self.trail.heap_space()
    }
}

/// A scoped acquisition of the scratch marks
///
/// Dropping the lease unmarks every literal that was marked through it, so
/// the array is guaranteed to be clean at the next use even if the caller
/// returns early.
pub struct MarkLease<'a> {
    marks: &'a mut Marks,
}

impl<'a> MarkLease<'a> {
    /// Mark a literal.
    ///
    /// Marking a literal whose variable is already marked with either sign
    /// is a fatal precondition violation.
    pub fn mark(&mut self, literal: Literal) {
        requires!(self.marks.value[literal.variable()] == 0);
        self.marks.value[literal.variable()] = if literal.is_negative() { -1 } else { 1 };
        self.marks.trail.push(literal);
    }
    /// See [Marks::sign](struct.Marks.html#method.sign).
    pub fn sign(&self, literal: Literal) -> i8 {
        self.marks.sign(literal)
    }
}

impl<'a> Drop for MarkLease<'a> {
    fn drop(&mut self) {
        while let Some(literal) = self.marks.trail.pop() {
            self.marks.value[literal.variable()] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lease_cleans_up() {
        let mut marks = Marks::new();
        marks.enlarge(Variable(9));
        {
            let mut lease = marks.lease();
            lease.mark(Literal::new(3));
            lease.mark(Literal::new(-7));
            assert_eq!(lease.sign(Literal::new(3)), 1);
            assert_eq!(lease.sign(Literal::new(-3)), -1);
            assert_eq!(lease.sign(Literal::new(-7)), 1);
            assert_eq!(lease.sign(Literal::new(9)), 0);
        }
        for lit in &[3, -3, 7, -7, 9] {
            assert_eq!(marks.sign(Literal::new(*lit)), 0);
        }
    }

    #[test]
    fn lease_cleans_up_on_early_exit() {
        let mut marks = Marks::new();
        marks.enlarge(Variable(4));
        // Simulates a tautology check bailing out half-way through.
        let tautological = |marks: &mut Marks| -> bool {
            let mut lease = marks.lease();
            for &lit in &[1, 2, -1] {
                let literal = Literal::new(lit);
                if lease.sign(literal) < 0 {
                    return true;
                }
                lease.mark(literal);
            }
            false
        };
        assert!(tautological(&mut marks));
        assert_eq!(marks.sign(Literal::new(1)), 0);
        assert_eq!(marks.sign(Literal::new(2)), 0);
    }

    #[test]
    fn growth_preserves_marks() {
        let mut marks = Marks::new();
        marks.enlarge(Variable(1));
        let mut lease = marks.lease();
        lease.mark(Literal::new(-1));
        lease.marks.enlarge(Variable(100));
        assert_eq!(lease.sign(Literal::new(-1)), 1);
        assert_eq!(lease.sign(Literal::new(100)), 0);
    }

    #[test]
    #[should_panic]
    fn double_marking_is_fatal() {
        let mut marks = Marks::new();
        marks.enlarge(Variable(1));
        let mut lease = marks.lease();
        lease.mark(Literal::new(1));
        lease.mark(Literal::new(-1));
    }
}
