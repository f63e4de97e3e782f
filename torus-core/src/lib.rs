//! # Torus-Core
//!
//! Torus-Core is a MARS: it loads assembled redcode warriors into a shared
//! circular core and schedules their processes against each other until one
//! warrior survives or a cycle cap declares a tie.  The core is a 2D torus;
//! with the default single row it behaves exactly like classic 1D Core War.
//!
//! ## Usage
//!
//! A battle is a [`Round`], built from a [`RoundConfig`] and the warrior
//! images produced by the `redcode-parser` crate:
//!
//! ```rust
//! use torus_core::{Round, RoundConfig};
//! use redcode::{RelaxedInstruction, RelaxedWarrior, Opcode, Modifier};
//!
//! // MOV.I $0, $1 copies itself one cell ahead, forever
//! let imp = RelaxedWarrior {
//!     name: Some("Imp".into()),
//!     code: vec![RelaxedInstruction {
//!         opcode: Opcode::Mov,
//!         modifier: Modifier::I,
//!         b_field: 1,
//!         ..Default::default()
//!     }],
//!     start: 0,
//! };
//!
//! let config = RoundConfig {
//!     cycles: 100,
//!     rng_seed: Some(7),
//!     ..Default::default()
//! };
//! let mut round = Round::new(config, &[imp.clone(), imp]).unwrap();
//! let outcome = round.run();
//! // Two imps never touch each other: the round runs to the cycle cap
//! assert_eq!(outcome.winner(), None);
//! assert_eq!(round.cycle(), 100);
//! ```
//!
//! ## Model
//!
//! * Every address is a [`redcode::Point`], wrapped componentwise against
//!   the core extent.  Wrapping happens in exactly one place
//!   ([`redcode::Point::normalize`]); everything else may produce
//!   out-of-range intermediate values freely.
//! * One **cycle** gives every living warrior one **step**: its next queued
//!   process executes a single instruction.  Queues are FIFO and capped;
//!   SPL beyond the cap silently drops the child.
//! * Everything observable is published as [`Event`]s: returned from
//!   [`Round::step`] and pushed synchronously into an optional
//!   [`EventSink`].
//! * Given the same configuration, warriors, and `rng_seed`, two rounds
//!   produce identical event streams.

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
    clippy::std_instead_of_core,
    clippy::str_to_string,
    clippy::todo,
    clippy::unimplemented,
    clippy::unreachable,
    clippy::unwrap_in_result,
    clippy::unwrap_used,
    clippy::use_debug,
)]

/// Round parameters and their validation
mod config;
pub use config::{ConfigError, RoundConfig};

/// The shared instruction array warriors fight in
mod core_mem;
pub use core_mem::Core;

/// Observable engine actions and their sinks
mod events;
pub use events::{Event, EventKind, EventSink};

/// Opcode bodies
mod execute;

/// Operand evaluation including predecrement and postincrement effects
mod operands;

/// Initial positioning of warriors under the minimum-distance rule
mod placement;
pub use placement::PlacementError;

/// Per-warrior FIFO process queues with a shared capacity
mod processes;

/// Round construction, the cycle scheduler, and termination rules
mod round;
pub use round::{CycleResult, Outcome, Round, RoundError};
