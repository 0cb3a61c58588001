//! Find-style query language: `-name`, `-type`, `-size`, `!`, `-a`, `-o` and
//! parentheses.

mod expression;
mod parser;

pub use expression::{Expression, NamePattern};
pub use parser::{QueryParseError, parse_query};
