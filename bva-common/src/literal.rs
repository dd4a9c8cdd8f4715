//! Variable and literal representations

use crate::memory::{HeapSpace, Offset};
use static_assertions::const_assert;
use std::{fmt, fmt::Display, mem::size_of, ops};

/// A boolean variable, i.e. the absolute value of a DIMACS literal
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct Variable(pub u32);

/// A signed literal, stored with a dense encoding
///
/// The encoding is `2 * variable + sign`, so both polarities of a variable
/// are adjacent and a literal can directly index per-literal tables like
/// the occurrence lists.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
pub struct Literal {
    encoding: u32,
}

impl Variable {
    pub fn new(value: u32) -> Variable {
        Variable(value)
    }
    /// The positive literal of this variable.
    pub fn literal(self) -> Literal {
        Literal {
            encoding: self.0 * 2,
        }
    }
}

impl Offset for Variable {
    fn as_offset(self) -> usize {
        self.0 as usize
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The number of slots a literal-indexed array needs for variables up to
/// and including `maxvar`.
pub fn literal_array_len(maxvar: Variable) -> usize {
    2 * (maxvar.as_offset() + 1)
}

impl Literal {
    /// Construct a new literal from the usual signed representation.
    ///
    /// Fails a precondition check when passed `i32::min_value()`, whose
    /// magnitude is not representable.
    pub fn new(value: i32) -> Literal {
        requires!(value != i32::min_value());
        Literal {
            encoding: (value.abs() as u32) * 2 + ((value < 0) as u32),
        }
    }
    /// Construct a literal from its dense encoding.
    pub fn from_raw(encoding: u32) -> Literal {
        Literal { encoding }
    }
    /// The dense encoding of this literal.
    pub fn encoding(self) -> u32 {
        self.encoding
    }
    /// Convert back to the signed representation.
    pub fn decode(self) -> i32 {
        let magnitude = self.variable().0 as i32;
        if self.encoding & 1 != 0 {
            -magnitude
        } else {
            magnitude
        }
    }
    /// The variable of this literal.
    ///
    /// Literal 0 has no variable; asking for it is a precondition violation.
    pub fn variable(self) -> Variable {
        requires!(!self.is_zero());
        Variable(self.encoding / 2)
    }
    /// Whether this is the literal 0, used only as clause terminator.
    pub fn is_zero(self) -> bool {
        self.encoding / 2 == 0
    }
    /// Whether this is a negative literal.
    pub fn is_negative(self) -> bool {
        self.encoding & 1 != 0
    }
}

impl Offset for Literal {
    fn as_offset(self) -> usize {
        self.encoding as usize
    }
}

impl HeapSpace for Literal {
    fn heap_space(&self) -> usize {
        0
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.decode())
    }
}

impl ops::Neg for Literal {
    type Output = Literal;
    fn neg(self) -> Literal {
        Literal {
            encoding: self.encoding ^ 1,
        }
    }
}

/// State the size of the literal representation.
#[allow(dead_code)]
fn assert_primitive_sizes() {
    const_assert!(size_of::<Literal>() == 4);
    const_assert!(size_of::<Variable>() == 4);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_encoding() {
        assert_eq!(Literal::new(3).encoding(), 6);
        assert_eq!(Literal::new(-3).encoding(), 7);
        assert_eq!(Literal::new(-3).variable(), Variable(3));
        assert_eq!(Literal::new(3), -Literal::new(-3));
        assert_eq!(Literal::new(-17).decode(), -17);
    }

    #[test]
    fn zero_is_the_terminator() {
        assert!(Literal::new(0).is_zero());
        assert!(!Literal::new(1).is_zero());
    }

    #[test]
    fn array_len_covers_both_polarities() {
        assert_eq!(literal_array_len(Variable(3)), 8);
        let lit = Literal::new(-3);
        assert!(lit.as_offset() < literal_array_len(lit.variable()));
    }
}
