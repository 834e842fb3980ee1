/*!
## Language Module

This Rust module provides the input cursor, the lexical helpers, the
abstract syntax tree, and the statement parser for Tiny BASIC.

*/

/// The single numeric type of the language.
pub type Number = i32;

/// A variable name is a single uppercase letter `A`-`Z`.
pub type VariableName = u8;

mod error;
mod lex;
mod position;

pub use error::Error;
pub use error::ErrorCode;
pub use lex::{any_character, literal, number_literal, string_literal, variable_name};
pub use position::{maybe, InputPos, ParseResult};

pub mod ast;
pub mod parse;
