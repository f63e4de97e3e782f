use core::fmt;

use serde::{Deserialize, Serialize};

use crate::Point;

/// Fields hold values that are positive offsets from their own core address.
/// They are stored and used modulo the x extent of the core.
pub type FieldValue = u32;

/// The operation portion of an instruction.
///
/// Covers the '88 ICWS subset plus the common SEQ/SNE/NOP extensions.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    FromPrimitive,
    ToPrimitive,
    Serialize,
    Deserialize,
)]
pub enum Opcode {
    /// Remove the current process from a warrior's queue
    Dat,

    /// Replace the B-target with the A-value and queue the next instruction
    Mov,

    /// Replace the B-target with the sum of the A/B values, and queue the
    /// next instruction
    Add,

    /// Replace the B-target with the B-value minus the A-value, and queue
    /// the next instruction
    Sub,

    /// Replace the B-target with the A-value times the B-value, and queue
    /// the next instruction
    Mul,

    /// Replace the B-target with the B-value divided by the A-value.  A zero
    /// divisor removes the current process instead of writing that part.
    Div,

    /// Replace the B-target with the remainder of the B-value divided by the
    /// A-value.  A zero divisor removes the current process instead of
    /// writing that part.
    Mod,

    /// Queue the A-operand's effective address
    Jmp,

    /// Queue the A-operand's effective address if the B-value is all zero,
    /// and otherwise queue the next instruction
    Jmz,

    /// Queue the A-operand's effective address if any part of the B-value is
    /// not zero, and otherwise queue the next instruction
    Jmn,

    /// Decrement the B-value and B-target, then queue the A-operand's
    /// effective address if any decremented part is not zero
    Djn,

    /// Queue the next instruction, and then queue the A-operand's effective
    /// address.  If the queue is full, only the next instruction is queued.
    Spl,

    /// Queue the instruction after next if every part of the A-value is less
    /// than the corresponding part of the B-value
    Slt,

    /// Queue the instruction after next if the A-value equals the B-value.
    /// `CMP` is the '88 mnemonic for [`Opcode::Seq`].
    Cmp,

    /// Queue the instruction after next if the A-value equals the B-value
    Seq,

    /// Queue the instruction after next if any part of the A-value is not
    /// equal to the corresponding part of the B-value
    Sne,

    /// Queue the next instruction and do nothing else
    Nop,
}

#[allow(
    clippy::use_debug,
    reason = "Debug formatter used to get the opcode mnemonic from enum value"
)]
impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Debug formatter to get the identifier of this variant
        write!(f, "{self:?}")
    }
}

/// The opcode modifier portion of a redcode instruction.
///
/// Selects which fields of the source and destination instructions
/// participate in an operation.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    FromPrimitive,
    ToPrimitive,
    Serialize,
    Deserialize,
)]
pub enum Modifier {
    /// A-number of the source to the A-number of the destination
    A,

    /// B-number of the source to the B-number of the destination
    B,

    /// A-number of the source to the B-number of the destination
    AB,

    /// B-number of the source to the A-number of the destination
    BA,

    /// Both numbers of the source to the same numbers of the destination
    F,

    /// Both numbers of the source to the opposite numbers of the destination
    X,

    /// The entire source instruction to the destination.  Arithmetic treats
    /// `I` as `F`.
    I,
}

#[allow(
    clippy::use_debug,
    reason = "Debug formatter used to get the modifier mnemonic from enum \
              value"
)]
impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Debug formatter to get the identifier of this variant
        write!(f, "{self:?}")
    }
}

/// The direction a process steps to reach its normal successor.
///
/// Classic 1D redcode always steps `D`.  In a core with a y extent of 1 the
/// `S` and `W` directions collapse to staying in place, since the single row
/// wraps onto itself.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    FromPrimitive,
    ToPrimitive,
    Serialize,
    Deserialize,
)]
pub enum Stepping {
    /// Rightward, `+(1, 0)`
    D,
    /// Downward, `+(0, 1)`
    S,
    /// Leftward, `+(-1, 0)`
    Q,
    /// Upward, `+(0, -1)`
    W,
}

impl Stepping {
    /// The offset one normal step moves the program counter
    #[must_use]
    pub const fn vector(self) -> Point {
        match self {
            Self::D => Point::new(1, 0),
            Self::S => Point::new(0, 1),
            Self::Q => Point::new(-1, 0),
            Self::W => Point::new(0, -1),
        }
    }
}

impl Default for Stepping {
    fn default() -> Self {
        Self::D
    }
}

#[allow(
    clippy::use_debug,
    reason = "Debug formatter used to get the stepping mnemonic from enum \
              value"
)]
impl fmt::Display for Stepping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// The addressing mode applied to one operand of an instruction.
///
/// This dialect keeps the '88 set: all indirection goes through B-fields.
#[derive(
    Copy,
    Clone,
    Debug,
    Eq,
    PartialEq,
    Hash,
    FromPrimitive,
    ToPrimitive,
    Serialize,
    Deserialize,
)]
pub enum AddrMode {
    /// Represented by `#`.  The operand is storage for data; its effective
    /// address is the current instruction itself.
    Immediate,

    /// Represented by `$`.  The operand value is an offset from the program
    /// counter.
    Direct,

    /// Represented by `@`.  The operand value points at an instruction whose
    /// B-field supplies a further offset.
    IndirectB,

    /// Represented by `<`.  As `@`, but the intermediate B-field is
    /// decremented before it is used.
    PredecB,

    /// Represented by `>`.  As `@`, but the intermediate B-field is
    /// incremented after the operand is evaluated.
    PostincB,
}

impl fmt::Display for AddrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Immediate => write!(f, "#"),
            Self::Direct => write!(f, "$"),
            Self::IndirectB => write!(f, "@"),
            Self::PredecB => write!(f, "<"),
            Self::PostincB => write!(f, ">"),
        }
    }
}

/// A complete in-core redcode instruction.
///
/// Field values are canonical: already reduced modulo the x extent of the
/// core the instruction lives in.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    /// The opcode portion of the instruction e.g. `DAT` or `JMP`
    pub opcode: Opcode,
    /// The modifier portion of the instruction e.g. `.BA` or `.X`
    pub modifier: Modifier,
    /// The stepping direction of the instruction e.g. `.D` or `.S`
    pub stepping: Stepping,
    /// The addressing mode used by the A operand e.g. `>` or `$`
    pub a_mode: AddrMode,
    /// The A-field stored in this instruction
    pub a_field: FieldValue,
    /// The addressing mode used by the B operand e.g. `>` or `$`
    pub b_mode: AddrMode,
    /// The B-field stored in this instruction
    pub b_field: FieldValue,
}

impl Default for Instruction {
    /// The empty-core cell `DAT.F $0, $0`, the canonical dead instruction
    fn default() -> Self {
        Self {
            opcode: Opcode::Dat,
            modifier: Modifier::F,
            stepping: Stepping::D,
            a_mode: AddrMode::Direct,
            a_field: 0,
            b_mode: AddrMode::Direct,
            b_field: 0,
        }
    }
}

impl fmt::Display for Instruction {
    /// Formats an instruction in the canonical source syntax.
    ///
    /// ```
    /// # use redcode::*;
    /// let a = Instruction {
    ///     opcode: Opcode::Add,
    ///     modifier: Modifier::AB,
    ///     stepping: Stepping::D,
    ///     a_mode: AddrMode::Immediate,
    ///     a_field: 16,
    ///     b_mode: AddrMode::Direct,
    ///     b_field: 32,
    /// };
    ///
    /// assert_eq!(a.to_string(), "Add.AB.D #16, $32");
    /// ```
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{} {}{}, {}{}",
            self.opcode,
            self.modifier,
            self.stepping,
            self.a_mode,
            self.a_field,
            self.b_mode,
            self.b_field
        )
    }
}

/// An [`Instruction`] that allows field values less than zero or greater
/// than the core size.
///
/// This is a convenience for code like the parser which has to produce
/// field values before the extent needed to reduce them is known.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct RelaxedInstruction {
    /// The opcode portion of the instruction
    pub opcode: Opcode,
    /// The modifier portion of the instruction
    pub modifier: Modifier,
    /// The stepping direction of the instruction
    pub stepping: Stepping,
    /// The addressing mode used by the A operand
    pub a_mode: AddrMode,
    /// The A-field, interpreted modulo the core's x extent
    pub a_field: i64,
    /// The addressing mode used by the B operand
    pub b_mode: AddrMode,
    /// The B-field, interpreted modulo the core's x extent
    pub b_field: i64,
}

impl Default for RelaxedInstruction {
    /// The relaxed form of the dead cell `DAT.F $0, $0`
    fn default() -> Self {
        Self {
            opcode: Opcode::Dat,
            modifier: Modifier::F,
            stepping: Stepping::D,
            a_mode: AddrMode::Direct,
            a_field: 0,
            b_mode: AddrMode::Direct,
            b_field: 0,
        }
    }
}

impl RelaxedInstruction {
    /// Convert into an [`Instruction`] by evaluating fields modulo
    /// `core_size`
    #[must_use]
    pub fn normalize(&self, core_size: u32) -> Instruction {
        Instruction {
            opcode: self.opcode,
            modifier: self.modifier,
            stepping: self.stepping,
            a_mode: self.a_mode,
            a_field: normalize_field(self.a_field, core_size),
            b_mode: self.b_mode,
            b_field: normalize_field(self.b_field, core_size),
        }
    }
}

/// An assembled warrior image, not yet bound to a core.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RelaxedWarrior {
    /// A label for score reports and debugging
    pub name: Option<String>,
    /// The instructions of the warrior, in load order
    pub code: Vec<RelaxedInstruction>,
    /// Offset into the warrior where execution begins
    ///
    /// Systems may or may not accept values outside of the range
    /// 0..code.len().
    pub start: i64,
}

impl Default for RelaxedWarrior {
    fn default() -> Self {
        Self {
            name: None,
            code: vec![RelaxedInstruction::default()],
            start: 0,
        }
    }
}

/// Evaluate a value as if it is a core offset, wrapping around at
/// `core_size`.
///
/// # Panics
///
/// Will panic if `core_size` is zero.
#[must_use]
pub fn normalize_field(value: i64, core_size: u32) -> FieldValue {
    assert!(core_size > 0, "core size must be positive");
    let size = i64::from(core_size);
    let reduced = value.rem_euclid(size);
    FieldValue::try_from(reduced).unwrap_or(0)
}

/// Determine the modifier an instruction gets when its source omits one.
///
/// This is the ICWS '88 defaults table with MOV and the comparison opcodes
/// defaulting to whole-instruction transfers.
#[must_use]
pub const fn default_modifiers(op: Opcode, a_mode: AddrMode) -> Modifier {
    match (op, a_mode) {
        (Opcode::Dat, _) => Modifier::F,
        (Opcode::Mov | Opcode::Cmp | Opcode::Seq | Opcode::Sne, _) => {
            Modifier::I
        }
        (
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Slt,
            AddrMode::Immediate,
        ) => Modifier::B,
        (
            Opcode::Add
            | Opcode::Sub
            | Opcode::Mul
            | Opcode::Div
            | Opcode::Mod
            | Opcode::Slt,
            _,
        ) => Modifier::F,
        (
            Opcode::Jmp
            | Opcode::Jmz
            | Opcode::Jmn
            | Opcode::Djn
            | Opcode::Spl
            | Opcode::Nop,
            _,
        ) => Modifier::B,
    }
}

/// Utilities for enumerating and iterating over all valid redcode
/// instructions
pub mod test_utils {
    use super::{AddrMode, Instruction, Modifier, Opcode, Stepping};

    /// All valid opcodes in this dialect
    pub const OPCODES: [Opcode; 17] = [
        Opcode::Dat,
        Opcode::Mov,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Mod,
        Opcode::Jmp,
        Opcode::Jmz,
        Opcode::Jmn,
        Opcode::Djn,
        Opcode::Spl,
        Opcode::Slt,
        Opcode::Cmp,
        Opcode::Seq,
        Opcode::Sne,
        Opcode::Nop,
    ];

    /// All valid modifiers
    pub const MODIFIERS: [Modifier; 7] = [
        Modifier::A,
        Modifier::B,
        Modifier::AB,
        Modifier::BA,
        Modifier::F,
        Modifier::X,
        Modifier::I,
    ];

    /// All valid stepping directions
    pub const STEPPINGS: [Stepping; 4] =
        [Stepping::D, Stepping::S, Stepping::Q, Stepping::W];

    /// All valid addressing modes
    pub const ADDR_MODES: [AddrMode; 5] = [
        AddrMode::Immediate,
        AddrMode::Direct,
        AddrMode::IndirectB,
        AddrMode::PredecB,
        AddrMode::PostincB,
    ];

    /// Iterate over every valid combination of opcode, modifier, stepping,
    /// and addressing modes, with both fields zero
    pub fn all_instructions() -> impl Iterator<Item = Instruction> {
        itertools::iproduct!(
            OPCODES.iter(),
            MODIFIERS.iter(),
            STEPPINGS.iter(),
            ADDR_MODES.iter(),
            ADDR_MODES.iter()
        )
        .map(|(o, m, s, a, b)| Instruction {
            opcode: *o,
            modifier: *m,
            stepping: *s,
            a_mode: *a,
            a_field: 0,
            b_mode: *b,
            b_field: 0,
        })
    }
}
