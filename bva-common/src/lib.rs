//! Internal modules for bva

pub mod config;
#[macro_use]
pub mod macros;
pub mod memory;
pub mod bva;
pub mod clause;
pub mod formula;
pub mod hashtable;
pub mod input;
pub mod literal;
pub mod marks;
pub mod occurrence;
pub mod output;
pub mod parser;
pub mod proof;
pub mod schedule;
