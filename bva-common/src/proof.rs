//! Proof emission interface
//!
//! The clause store notifies a tracer of every clause addition and
//! deletion, which is enough to produce a DRAT-like deletion-annotated
//! trace certifying that the input and output formulas are
//! equisatisfiable. The core never depends on whether a real tracer is
//! attached.

use crate::{clause::write_clause, literal::Literal};
use std::io::Write;

/// Collaborator notified of clause store mutations
pub trait ProofTracer {
    /// Called once per successful clause insertion.
    ///
    /// `original` is true for clauses read from the input formula, so a
    /// certificate writer can skip re-declaring them.
    fn notify_added(&mut self, literals: &[Literal], original: bool);
    /// Called once per successful clause retraction.
    fn notify_deleted(&mut self, literals: &[Literal]);
    /// Free-form annotation, e.g. end-of-run statistics.
    fn notify_comment(&mut self, text: &str);
}

/// A tracer that does nothing
#[derive(Debug, Default)]
pub struct NullTracer;

impl ProofTracer for NullTracer {
    fn notify_added(&mut self, _literals: &[Literal], _original: bool) {}
    fn notify_deleted(&mut self, _literals: &[Literal]) {}
    fn notify_comment(&mut self, _text: &str) {}
}

/// Writes a deletion-annotated clausal trace
///
/// Added non-original clauses are written as their literals followed by
/// `0`; deletions with a `d` prefix; comments with a `c ` prefix.
pub struct DratTracer<W: Write> {
    sink: W,
}

impl<W: Write> DratTracer<W> {
    pub fn new(sink: W) -> DratTracer<W> {
        DratTracer { sink }
    }
}

impl<W: Write> ProofTracer for DratTracer<W> {
    fn notify_added(&mut self, literals: &[Literal], original: bool) {
        if original {
            return;
        }
        write_clause(&mut self.sink, literals)
            .and_then(|()| writeln!(self.sink))
            .unwrap_or_else(|err| die!("failed to write proof trace: {}", err));
    }
    fn notify_deleted(&mut self, literals: &[Literal]) {
        write!(self.sink, "d ")
            .and_then(|()| write_clause(&mut self.sink, literals))
            .and_then(|()| writeln!(self.sink))
            .unwrap_or_else(|err| die!("failed to write proof trace: {}", err));
    }
    fn notify_comment(&mut self, text: &str) {
        writeln!(self.sink, "c {}", text)
            .unwrap_or_else(|err| die!("failed to write proof trace: {}", err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lits(clause: &[i32]) -> Vec<Literal> {
        clause.iter().cloned().map(Literal::new).collect()
    }

    #[test]
    fn trace_format() {
        let mut buffer = Vec::new();
        {
            let mut tracer = DratTracer::new(&mut buffer);
            tracer.notify_added(&lits(&[1, 2]), true);
            tracer.notify_added(&lits(&[3, -4]), false);
            tracer.notify_deleted(&lits(&[1, 2]));
            tracer.notify_comment("done");
        }
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "3 -4 0\nd 1 2 0\nc done\n"
        );
    }
}
