/*!
# Rust Language Module

This Rust module provides lexical analysis and parsing of the BASIC
expression language, statement splitting, and statement addressing.

*/

pub type Column = std::ops::Range<usize>;
pub type LineNumber = u32;

#[macro_use]
mod error;
mod lex;
mod line;
mod parse;
mod pointer;
mod token;

pub mod ast;
pub mod name;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::lex;
pub use line::{find_assignment, find_keyword, split_top_level, split_unquoted};
pub use line::Line;
pub use parse::parse;
pub use parse::parse_list;
pub use pointer::Pointer;
pub use token::{Literal, Operator, Token};

#[cfg(test)]
mod tests;
