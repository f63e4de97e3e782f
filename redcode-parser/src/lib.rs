// Make clippy as annoying as possible
#![deny(
    // All typically enabled warnings are converted into errors
    // includes correctness, suspicious, style, complexity, and perf
    clippy::all,
    // Error on cargo lints
    clippy::cargo,
)]
#![warn(
    // Warn on pedantic and in-development nursery lints
    clippy::pedantic,
    clippy::nursery,
    // Lints from "restriction" group - enforce a consistent if arbitrary style
    clippy::alloc_instead_of_core,
    clippy::dbg_macro,
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::if_then_some_else_none,
    clippy::indexing_slicing,
    clippy::missing_docs_in_private_items,
    clippy::panic_in_result_fn,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::str_to_string,
    clippy::todo,
    clippy::unimplemented,
    clippy::unreachable,
    clippy::unwrap_in_result,
    clippy::unwrap_used,
    clippy::use_debug,
)]

//! Assembler for redcode source text.
//!
//! Translates a warrior's source into a [`redcode::RelaxedWarrior`]: an
//! instruction image plus a start offset.  The accepted grammar is
//!
//! ```text
//! [label]  OPCODE[.MODIFIER][.STEP]  [MODE]EXPR  [, [MODE]EXPR]
//! ```
//!
//! with `;` comments, blank lines, and the `ORG` and `END` pseudo-ops.
//! Mnemonics and labels are case-insensitive.  Every failure carries the
//! source line it was detected on.

/// Assembly of whole warriors: label collection and resolution
mod source_parser;
pub use source_parser::{parse, ParseError, ParseErrorKind};

/// Classification of the content of a single source line
mod line_parser;

/// nom parsers for well defined primitives of the redcode grammar
mod primitives;
