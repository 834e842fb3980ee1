//! # Tiny BASIC
//!
//! An interpreter for the Tiny BASIC dialect: numbered lines, single-letter
//! variables, one `@()` array, and an interactive prompt.
//! ```text
//! TINY BASIC
//! > 10 PRINT "HELLO"
//! > RUN
//! HELLO
//! ```
//!
//! The [`lang`] module parses statements; the [`mach`] module stores and
//! executes them behind a character-at-a-time I/O adapter, so the same
//! interpreter runs against a terminal, a test harness, or anything else
//! that implements [`mach::Io`]. The [`term`] module is the bundled
//! terminal front end.
//!

pub mod lang;
pub mod mach;
pub mod term;
