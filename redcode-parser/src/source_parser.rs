use std::collections::HashMap;

use redcode::{RelaxedInstruction, RelaxedWarrior};
use thiserror::Error;

use crate::line_parser::{
    statement, Expr, SourceInstruction, SourceOperand, Statement,
};

/// A parse failure, located on the source line it was detected on
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {kind}")]
pub struct ParseError {
    /// 1-based source line number
    pub line: u32,
    /// What went wrong
    pub kind: ParseErrorKind,
}

/// Categories of parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The mnemonic position held something that is not an opcode
    #[error("unknown opcode `{0}`")]
    UnknownOpcode(String),

    /// A dotted suffix was neither a modifier nor a stepping direction,
    /// or appeared out of order
    #[error("unknown modifier or stepping `{0}`")]
    UnknownModifier(String),

    /// An operand could not be read
    #[error("malformed operand near `{0}`")]
    BadOperand(String),

    /// An instruction was missing a required operand
    #[error("missing operand")]
    MissingOperand,

    /// An operand or pseudo-op referenced a label with no definition
    #[error("label `{0}` is never defined")]
    UnresolvedLabel(String),

    /// The same label was defined on two lines
    #[error("label `{0}` is defined twice")]
    DuplicateLabel(String),

    /// An `ORG` or `END` argument could not be read
    #[error("malformed pseudo-op argument near `{0}`")]
    MalformedPseudoOp(String),

    /// A label adjustment overflowed during resolution
    #[error("expression overflow while resolving a label offset")]
    ExpressionOverflow,
}

/// Parse a complete redcode source buffer into a warrior image.
///
/// Parsing stops at `END` or at the end of the input.  The resulting image
/// keeps relaxed (signed, unreduced) field values; they are reduced against
/// a core size when the warrior is loaded.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying the 1-based line number for unknown
/// mnemonics, malformed operands, pseudo-op problems, and label issues.
pub fn parse(source: &str) -> Result<RelaxedWarrior, ParseError> {
    let mut name = None;
    let mut code: Vec<(u32, SourceInstruction)> = vec![];
    let mut labels: HashMap<String, i64> = HashMap::new();
    // Bare labels waiting for the next instruction to attach to
    let mut pending: Vec<(u32, String)> = vec![];
    let mut start: Option<(u32, Expr)> = None;

    for (idx, text) in source.lines().enumerate() {
        let line = u32::try_from(idx).unwrap_or(u32::MAX).saturating_add(1);
        match statement(text).map_err(|kind| ParseError { line, kind })? {
            Statement::Empty => {}
            Statement::Name(n) => {
                // The first ;name line wins
                name.get_or_insert(n);
            }
            Statement::Label(label) => pending.push((line, label)),
            Statement::Org(expr) => start = Some((line, expr)),
            Statement::End(Some(expr)) => {
                start = Some((line, expr));
                break;
            }
            Statement::End(None) => break,
            Statement::Instruction(label, instr) => {
                let here = i64::try_from(code.len()).unwrap_or(i64::MAX);
                for (label_line, label) in pending.drain(..) {
                    define(&mut labels, label, here)
                        .map_err(|kind| ParseError { line: label_line, kind })?;
                }
                if let Some(label) = label {
                    define(&mut labels, label, here)
                        .map_err(|kind| ParseError { line, kind })?;
                }
                code.push((line, instr));
            }
        }
    }

    // Bare labels after the last instruction address one past the end
    let here = i64::try_from(code.len()).unwrap_or(i64::MAX);
    for (label_line, label) in pending.drain(..) {
        define(&mut labels, label, here)
            .map_err(|kind| ParseError { line: label_line, kind })?;
    }

    let resolved = code
        .iter()
        .enumerate()
        .map(|(index, (line, instr))| {
            resolve_instruction(&labels, instr, i64::try_from(index).unwrap_or(0))
                .map_err(|kind| ParseError { line: *line, kind })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let start = match start {
        None => 0,
        Some((line, expr)) => resolve_absolute(&labels, &expr)
            .map_err(|kind| ParseError { line, kind })?,
    };

    Ok(RelaxedWarrior {
        name,
        code: resolved,
        start,
    })
}

/// Record a label definition, rejecting redefinitions
fn define(
    labels: &mut HashMap<String, i64>,
    label: String,
    target: i64,
) -> Result<(), ParseErrorKind> {
    if labels.contains_key(&label) {
        return Err(ParseErrorKind::DuplicateLabel(label));
    }
    labels.insert(label, target);
    Ok(())
}

/// Turn a source instruction into a relaxed instruction by resolving its
/// operand expressions relative to its own position
fn resolve_instruction(
    labels: &HashMap<String, i64>,
    instr: &SourceInstruction,
    index: i64,
) -> Result<RelaxedInstruction, ParseErrorKind> {
    let b = instr.b.clone().unwrap_or_else(SourceOperand::default_b);
    Ok(RelaxedInstruction {
        opcode: instr.opcode,
        modifier: instr.modifier,
        stepping: instr.stepping,
        a_mode: instr.a.mode,
        a_field: resolve_relative(labels, &instr.a.expr, index)?,
        b_mode: b.mode,
        b_field: resolve_relative(labels, &b.expr, index)?,
    })
}

/// Resolve an operand expression to a signed offset from its instruction
fn resolve_relative(
    labels: &HashMap<String, i64>,
    expr: &Expr,
    index: i64,
) -> Result<i64, ParseErrorKind> {
    match expr {
        Expr::Literal(value) => Ok(*value),
        Expr::Label(name, adjust) => {
            let target = labels
                .get(name)
                .ok_or_else(|| ParseErrorKind::UnresolvedLabel(name.clone()))?;
            target
                .checked_sub(index)
                .and_then(|offset| offset.checked_add(*adjust))
                .ok_or(ParseErrorKind::ExpressionOverflow)
        }
    }
}

/// Resolve an `ORG`/`END` argument to an absolute instruction index
fn resolve_absolute(
    labels: &HashMap<String, i64>,
    expr: &Expr,
) -> Result<i64, ParseErrorKind> {
    match expr {
        Expr::Literal(value) => Ok(*value),
        Expr::Label(name, adjust) => {
            let target = labels
                .get(name)
                .ok_or_else(|| ParseErrorKind::UnresolvedLabel(name.clone()))?;
            target
                .checked_add(*adjust)
                .ok_or(ParseErrorKind::ExpressionOverflow)
        }
    }
}
