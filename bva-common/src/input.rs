//! File reader

use std::{
    io::{Error, ErrorKind, Result},
    iter::Peekable,
};

/// A peekable iterator for bytes that records position information.
///
/// The bytes of the line being read are retained so that parse errors can
/// show the offending line.
pub struct Input<'a> {
    /// The source of the input data
    source: Peekable<Box<dyn Iterator<Item = u8> + 'a>>,
    /// The current line number
    line: usize,
    /// The current column
    column: usize,
    /// The bytes consumed since the last linebreak
    current_line: Vec<u8>,
}

impl<'a> Input<'a> {
    /// Create a new `Input` from some source
    pub fn new(source: Box<dyn Iterator<Item = u8> + 'a>) -> Self {
        Input {
            source: source.peekable(),
            line: 1,
            column: 1,
            current_line: Vec::new(),
        }
    }
    /// Look at the next byte without consuming it
    pub fn peek(&mut self) -> Option<u8> {
        self.source.peek().cloned()
    }
    /// Create an io::Error with the given message and position information.
    pub fn error(&self, why: &str) -> Error {
        let line = String::from_utf8_lossy(&self.current_line);
        Error::new(
            ErrorKind::InvalidData,
            format!(
                "{} at line {} column {} (\"{}\")",
                why,
                self.line,
                self.column,
                line.trim_end()
            ),
        )
    }

    /// Parse a decimal number.
    ///
    /// Consumes one or more decimal digits with an optional leading dash,
    /// returning the value of the resulting number on success. Fails if
    /// there is no digit, or if the number does not lie within the range
    /// [-i32::MAX, i32::MAX].
    pub fn parse_dec32(&mut self) -> Result<i32> {
        let sign: bool = self.peek() == Some(b'-');
        if sign {
            self.next();
        }
        if self.peek().map_or(true, |c| !Self::is_digit(c)) {
            return Err(self.error(Input::NUMBER));
        }
        let mut value: i32 = 0;
        while let Some(c) = self.peek() {
            if !Self::is_digit(c) {
                break;
            }
            // Does not unnecessarily overflow because of the order of operations
            value = value
                .checked_mul(10)
                .and_then(|val| val.checked_add(i32::from(c - b'0')))
                .ok_or_else(|| self.error(Input::OVERFLOW))?;
            self.next();
        }
        Ok(if sign { -value } else { value })
    }

    /// Parse zero or more spaces or linebreaks.
    pub fn skip_any_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !Self::is_space(c) {
                break;
            }
            self.next();
        }
    }

    /// Skips whitespace, and returns an error if no space nor EOF was parsed.
    pub fn skip_some_whitespace(&mut self) -> Result<()> {
        if let Some(c) = self.peek() {
            if !Self::is_space(c) {
                return Err(self.error(Input::SPACE));
            }
        }
        self.skip_any_whitespace();
        Ok(())
    }

    // Error messages.
    /// A numeric overflow. This should only happen for user input.
    pub const OVERFLOW: &'static str = "overflow while parsing number";
    /// Parser error (`expected ...`)
    pub const NUMBER: &'static str = "expected number";
    /// Parser error (`expected ...`)
    pub const SPACE: &'static str = "expected space";
    /// Parser error (`expected ...`)
    pub const P_CNF: &'static str = "expected \"p cnf\"";
    /// Parser error (`expected ...`)
    pub const NEWLINE: &'static str = "expected newline";

    /// Check if a character is a decimal digit.
    pub fn is_digit(value: u8) -> bool {
        value >= b'0' && value <= b'9'
    }

    /// Returns true if the character is one of the whitespace characters we allow.
    pub fn is_space(c: u8) -> bool {
        [b' ', b'\t', b'\n', b'\r'].iter().any(|&s| s == c)
    }
}

impl Iterator for Input<'_> {
    type Item = u8;
    fn next(&mut self) -> Option<u8> {
        self.source.next().map(|c| {
            if c == b'\n' {
                self.line += 1;
                self.column = 0;
                self.current_line.clear();
            } else {
                self.current_line.push(c);
            }
            self.column += 1;
            c
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(text: &str) -> Input {
        Input::new(Box::new(text.as_bytes().iter().cloned()))
    }

    #[test]
    fn parses_signed_numbers() {
        let mut it = input("-42 7");
        assert_eq!(it.parse_dec32().ok(), Some(-42));
        it.skip_any_whitespace();
        assert_eq!(it.parse_dec32().ok(), Some(7));
        assert!(it.parse_dec32().is_err());
    }

    #[test]
    fn error_shows_line_content() {
        let mut it = input("p cnf x\n");
        for _ in 0..6 {
            it.next();
        }
        let message = format!("{}", it.error(Input::NUMBER));
        assert!(message.contains("line 1"));
        assert!(message.contains("p cnf"));
    }
}
