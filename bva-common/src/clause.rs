//! Clause handles and the clause arena

use crate::{
    literal::Literal,
    memory::{HeapSpace, Offset},
};
use std::{
    convert::TryFrom,
    fmt,
    io::{self, Write},
};

/// An index uniquely identifying a clause during the lifetime of the program
///
/// Handles are stable: they stay valid across insertions and deletions of
/// other clauses, which is what lets occurrence lists reference clauses
/// without owning them.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Default)]
pub struct ClauseRef {
    pub index: u32,
}

impl ClauseRef {
    pub fn new(index: u32) -> ClauseRef {
        ClauseRef { index }
    }
    pub fn from_usize(index: usize) -> ClauseRef {
        requires!(u32::try_from(index).is_ok());
        ClauseRef {
            index: index as u32,
        }
    }
}

impl Offset for ClauseRef {
    fn as_offset(self) -> usize {
        self.index as usize
    }
}

impl HeapSpace for ClauseRef {
    fn heap_space(&self) -> usize {
        0
    }
}

impl fmt::Display for ClauseRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

/// Location and metadata of one clause inside the arena buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    /// Offset of the first literal in the flat buffer
    start: usize,
    /// Number of literals
    length: u32,
    /// Metadata bits, see `Slot::DELETED`
    flags: u32,
}

impl Slot {
    const DELETED: u32 = 1;
}

impl HeapSpace for Slot {
    fn heap_space(&self) -> usize {
        0
    }
}

/// Stores clauses in a flat buffer
///
/// Deleting a clause only flips a flag. The literal data stays readable
/// until teardown, so occurrence-list compaction and proof emission can
/// still look at a clause that has already been retracted from the store.
#[derive(Debug, Default, PartialEq)]
pub struct ClauseArena {
    /// The literals of all clauses, one clause after the other
    data: Vec<Literal>,
    /// Maps clause handle to its location in `data`
    slots: Vec<Slot>,
}

impl ClauseArena {
    pub fn new() -> ClauseArena {
        ClauseArena::default()
    }
    fn slot(&self, clause: ClauseRef) -> Slot {
        self.slots[clause.as_offset()]
    }
    /// Copy the given literals into the arena as a new clause.
    pub fn alloc(&mut self, literals: &[Literal]) -> ClauseRef {
        let clause = ClauseRef::from_usize(self.slots.len());
        self.slots.push(Slot {
            start: self.data.len(),
            length: u32::try_from(literals.len()).unwrap_or_else(|_| {
                crate::output::unreachable() // clause length is bounded by the variable count
            }),
            flags: 0,
        });
        self.data.extend_from_slice(literals);
        clause
    }
    /// The literals of the clause. Valid also for deleted clauses.
    pub fn literals(&self, clause: ClauseRef) -> &[Literal] {
        let slot = self.slot(clause);
        &self.data[slot.start..slot.start + slot.length as usize]
    }
    /// The number of literals in the clause.
    pub fn length(&self, clause: ClauseRef) -> usize {
        self.slot(clause).length as usize
    }
    /// Whether the clause has not been deleted.
    pub fn is_live(&self, clause: ClauseRef) -> bool {
        self.slot(clause).flags & Slot::DELETED == 0
    }
    /// Flag the clause as deleted.
    pub fn delete(&mut self, clause: ClauseRef) {
        requires!(self.is_live(clause));
        self.slots[clause.as_offset()].flags |= Slot::DELETED;
    }
    /// The total number of clauses ever allocated, including deleted ones.
    pub fn number_of_clauses(&self) -> usize {
        self.slots.len()
    }
    /// Iterate over the handles of all live clauses, in allocation order.
    pub fn live_clauses(&self) -> impl Iterator<Item = ClauseRef> + '_ {
        (0..self.slots.len())
            .map(ClauseRef::from_usize)
            .filter(move |&clause| self.is_live(clause))
    }
    /// Render a clause for diagnostics, like `[3] 1 2 0`.
    pub fn clause_to_string(&self, clause: ClauseRef) -> String {
        let mut result = format!("[{}]", clause);
        for &literal in self.literals(clause) {
            result += &format!(" {}", literal);
        }
        result + " 0"
    }
}

impl HeapSpace for ClauseArena {
    fn heap_space(&self) -> usize {
        self.data.heap_space() + self.slots.heap_space()
    }
}

/// Write some literals in DIMACS format.
///
/// Includes a terminating 0, but no newline.
pub fn write_clause<'a, T>(file: &mut impl Write, clause: T) -> io::Result<()>
where
    T: IntoIterator<Item = &'a Literal>,
{
    for &literal in clause {
        write!(file, "{} ", literal)?;
    }
    write!(file, "0")
}
