//! Representations for the 2D redcode dialect used in CoreWar
//!
//! Supports the ICWS '88 instruction subset (B-field indirection only)
//! extended with a two-dimensional core address space and per-instruction
//! stepping directions.
//!
//! See also the ['88 ICWS standard](https://corewar.co.uk/standards/icws88.txt)

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

// used to convert redcode enums to numerical values
#[macro_use]
extern crate num_derive;

/// The signed 2D coordinate type used for core addresses and offsets
mod point;
pub use point::{ParsePointError, Point};

/// Standard representations for redcode types
mod redcode;
pub use crate::redcode::*;
