use redcode::{default_modifiers, AddrMode, Modifier, Opcode, Stepping};

use crate::{
    primitives::{addr_mode, exact, identifier, modifier, number, opcode, stepping},
    source_parser::ParseErrorKind,
};

/// An operand expression, before labels are resolved
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    /// A literal signed value
    Literal(i64),
    /// A label use with a literal adjustment, e.g. `loop+3`
    Label(String, i64),
}

/// One operand: an addressing mode and an unresolved expression
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceOperand {
    /// The addressing mode, explicit or defaulted to `$`
    pub mode: AddrMode,
    /// The still-symbolic value
    pub expr: Expr,
}

impl SourceOperand {
    /// The implied B-operand of a one-operand instruction
    pub const fn default_b() -> Self {
        Self {
            mode: AddrMode::Direct,
            expr: Expr::Literal(0),
        }
    }
}

/// An instruction as written, before label resolution and field reduction
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceInstruction {
    /// The opcode
    pub opcode: Opcode,
    /// The modifier, already defaulted when the source omitted it
    pub modifier: Modifier,
    /// The stepping direction, already defaulted when the source omitted it
    pub stepping: Stepping,
    /// The A operand
    pub a: SourceOperand,
    /// The B operand, if one was written
    pub b: Option<SourceOperand>,
}

/// The classified content of one source line
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// Nothing but whitespace or a plain comment
    Empty,
    /// A `;name ...` metadata comment
    Name(String),
    /// A label alone on its line, attaching to the next instruction
    Label(String),
    /// An `ORG` pseudo-op carrying the start offset
    Org(Expr),
    /// An `END` pseudo-op, optionally carrying the start offset
    End(Option<Expr>),
    /// An instruction, possibly preceded by a label definition
    Instruction(Option<String>, SourceInstruction),
}

/// Classify the content of a single source line.
///
/// Comments have no effect on classification except for the pMARS-style
/// `;name` metadata line.  The caller supplies line numbers for errors.
pub fn statement(text: &str) -> Result<Statement, ParseErrorKind> {
    let trimmed = text.trim_start();
    if let Some(comment) = trimmed.strip_prefix(';') {
        let comment = comment.trim_start();
        let keyword = comment.get(..4).filter(|w| w.eq_ignore_ascii_case("name"));
        if keyword.is_some() {
            let arg = comment.get(4..).unwrap_or("");
            // Require a separator so ";nameless" stays a plain comment
            if arg.starts_with(char::is_whitespace) && !arg.trim().is_empty() {
                return Ok(Statement::Name(arg.trim().to_owned()));
            }
        }
        return Ok(Statement::Empty);
    }

    // Strip a trailing comment, then work on bare code
    let code = text.split(';').next().unwrap_or("").trim();
    if code.is_empty() {
        return Ok(Statement::Empty);
    }

    let Ok((rest, word)) = identifier(code) else {
        return Err(ParseErrorKind::UnknownOpcode(first_word(code)));
    };

    if word.eq_ignore_ascii_case("ORG") {
        let (expr, leftover) = expr(rest)
            .map_err(|_| ParseErrorKind::MalformedPseudoOp(rest.trim().to_owned()))?;
        if !leftover.trim().is_empty() {
            return Err(ParseErrorKind::MalformedPseudoOp(leftover.trim().to_owned()));
        }
        return Ok(Statement::Org(expr));
    }
    if word.eq_ignore_ascii_case("END") {
        if rest.trim().is_empty() {
            return Ok(Statement::End(None));
        }
        let (expr, leftover) = expr(rest)
            .map_err(|_| ParseErrorKind::MalformedPseudoOp(rest.trim().to_owned()))?;
        if !leftover.trim().is_empty() {
            return Err(ParseErrorKind::MalformedPseudoOp(leftover.trim().to_owned()));
        }
        return Ok(Statement::End(Some(expr)));
    }

    if let Some(op) = exact(opcode, word) {
        return Ok(Statement::Instruction(None, instruction(op, rest)?));
    }

    // Not a mnemonic, so the leading identifier is a label definition
    let label = word.to_ascii_lowercase();
    let rest = rest.trim_start();
    if rest.is_empty() {
        return Ok(Statement::Label(label));
    }
    let Ok((after, word)) = identifier(rest) else {
        return Err(ParseErrorKind::UnknownOpcode(first_word(rest)));
    };
    let Some(op) = exact(opcode, word) else {
        return Err(ParseErrorKind::UnknownOpcode(word.to_owned()));
    };
    Ok(Statement::Instruction(Some(label), instruction(op, after)?))
}

/// Parse the remainder of an instruction line after its opcode mnemonic
fn instruction(
    op: Opcode,
    input: &str,
) -> Result<SourceInstruction, ParseErrorKind> {
    let mut input = input;
    let mut explicit_modifier = None;
    let mut explicit_stepping = None;

    // Dotted suffixes attach directly to the mnemonic.  Modifier and
    // stepping tokens are disjoint; a modifier may only precede a stepping.
    if let Some(rest) = input.strip_prefix('.') {
        let (after, token) = identifier(rest)
            .map_err(|_| ParseErrorKind::UnknownModifier(first_word(rest)))?;
        if let Some(m) = exact(modifier, token) {
            explicit_modifier = Some(m);
            input = after;
            if let Some(rest) = input.strip_prefix('.') {
                let (after, token) = identifier(rest).map_err(|_| {
                    ParseErrorKind::UnknownModifier(first_word(rest))
                })?;
                let s = exact(stepping, token)
                    .ok_or_else(|| ParseErrorKind::UnknownModifier(token.to_owned()))?;
                explicit_stepping = Some(s);
                input = after;
            }
        } else if let Some(s) = exact(stepping, token) {
            explicit_stepping = Some(s);
            input = after;
        } else {
            return Err(ParseErrorKind::UnknownModifier(token.to_owned()));
        }
    }
    if input.starts_with('.') {
        return Err(ParseErrorKind::UnknownModifier(first_word(input)));
    }

    let input = input.trim_start();
    if input.is_empty() {
        return Err(ParseErrorKind::MissingOperand);
    }
    let (a, rest) = operand(input)?;

    let rest = rest.trim_start();
    let (b, rest) = if let Some(after_comma) = rest.strip_prefix(',') {
        let after_comma = after_comma.trim_start();
        if after_comma.is_empty() {
            return Err(ParseErrorKind::MissingOperand);
        }
        let (b, rest) = operand(after_comma)?;
        (Some(b), rest)
    } else {
        (None, rest)
    };

    if !rest.trim().is_empty() {
        return Err(ParseErrorKind::BadOperand(rest.trim().to_owned()));
    }

    Ok(SourceInstruction {
        opcode: op,
        modifier: explicit_modifier
            .unwrap_or_else(|| default_modifiers(op, a.mode)),
        stepping: explicit_stepping.unwrap_or_default(),
        a,
        b,
    })
}

/// Parse one operand: an optional mode sigil and an expression.
///
/// Without a sigil the mode defaults to `$` only for operands that begin
/// with a digit or a sign; a bare label needs its mode written out.
fn operand(input: &str) -> Result<(SourceOperand, &str), ParseErrorKind> {
    if let Ok((rest, mode)) = addr_mode(input) {
        let (expr, rest) = expr(rest)
            .map_err(|_| ParseErrorKind::BadOperand(first_word(rest)))?;
        return Ok((SourceOperand { mode, expr }, rest));
    }
    if input.starts_with(|c: char| c.is_ascii_digit() || c == '+' || c == '-') {
        let (rest, value) = number(input)
            .map_err(|_| ParseErrorKind::BadOperand(first_word(input)))?;
        return Ok((
            SourceOperand {
                mode: AddrMode::Direct,
                expr: Expr::Literal(value),
            },
            rest,
        ));
    }
    Err(ParseErrorKind::BadOperand(first_word(input)))
}

/// Error type local to expression parsing; mapped to a kind by callers
struct NoExpr;

/// Parse a literal, a label, or a `label±literal` composition
fn expr(input: &str) -> Result<(Expr, &str), NoExpr> {
    let input = input.trim_start();
    if let Ok((rest, value)) = number(input) {
        return Ok((Expr::Literal(value), rest));
    }
    let (rest, name) = identifier(input).map_err(|_| NoExpr)?;
    let name = name.to_ascii_lowercase();
    let trimmed = rest.trim_start();
    if trimmed.starts_with(['+', '-']) {
        let (rest, adjust) = number(trimmed).map_err(|_| NoExpr)?;
        return Ok((Expr::Label(name, adjust), rest));
    }
    Ok((Expr::Label(name, 0), rest))
}

/// The first whitespace-delimited word of the input, for error messages
fn first_word(input: &str) -> String {
    input
        .trim()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comments_and_blanks_are_empty() {
        assert_eq!(statement(""), Ok(Statement::Empty));
        assert_eq!(statement("   \t"), Ok(Statement::Empty));
        assert_eq!(statement("; just words"), Ok(Statement::Empty));
    }

    #[test]
    fn name_metadata_is_recognized() {
        assert_eq!(
            statement(";name Dwarf"),
            Ok(Statement::Name("Dwarf".to_owned()))
        );
        assert_eq!(
            statement("; name  Sweeper 2 "),
            Ok(Statement::Name("Sweeper 2".to_owned()))
        );
        // A ;name with no argument is a plain comment
        assert_eq!(statement(";name"), Ok(Statement::Empty));
    }

    #[test]
    fn instruction_with_all_parts() {
        let parsed = statement("mov.x.q  <5, >loop-2 ; bomb");
        assert_eq!(
            parsed,
            Ok(Statement::Instruction(
                None,
                SourceInstruction {
                    opcode: Opcode::Mov,
                    modifier: Modifier::X,
                    stepping: Stepping::Q,
                    a: SourceOperand {
                        mode: AddrMode::PredecB,
                        expr: Expr::Literal(5),
                    },
                    b: Some(SourceOperand {
                        mode: AddrMode::PostincB,
                        expr: Expr::Label("loop".to_owned(), -2),
                    }),
                }
            ))
        );
    }

    #[test]
    fn stepping_without_modifier() {
        let Ok(Statement::Instruction(None, instr)) = statement("MOV.S $0, $1")
        else {
            panic!("expected an instruction");
        };
        assert_eq!(instr.modifier, Modifier::I);
        assert_eq!(instr.stepping, Stepping::S);
    }

    #[test]
    fn modifier_defaults_follow_the_opcode_table() {
        let cases = [
            ("DAT #0, #0", Modifier::F),
            ("MOV $0, $1", Modifier::I),
            ("ADD #4, $3", Modifier::B),
            ("ADD $4, $3", Modifier::F),
            ("SLT #1, $2", Modifier::B),
            ("JMP $-2", Modifier::B),
            ("CMP $1, $2", Modifier::I),
        ];
        for (line, expected) in cases {
            let Ok(Statement::Instruction(None, instr)) = statement(line)
            else {
                panic!("failed to parse {line}");
            };
            assert_eq!(instr.modifier, expected, "for {line}");
        }
    }

    #[test]
    fn one_operand_instructions_leave_b_unwritten() {
        let Ok(Statement::Instruction(None, instr)) = statement("JMP -2")
        else {
            panic!("expected an instruction");
        };
        assert_eq!(instr.a.mode, AddrMode::Direct);
        assert_eq!(instr.a.expr, Expr::Literal(-2));
        assert_eq!(instr.b, None);
    }

    #[test]
    fn labeled_and_bare_labels() {
        assert_eq!(
            statement("loop"),
            Ok(Statement::Label("loop".to_owned()))
        );
        let Ok(Statement::Instruction(Some(label), _)) =
            statement("Target DAT #0, #0")
        else {
            panic!("expected a labeled instruction");
        };
        assert_eq!(label, "target");
    }

    #[test]
    fn pseudo_ops() {
        assert_eq!(statement("ORG 2"), Ok(Statement::Org(Expr::Literal(2))));
        assert_eq!(
            statement("org start"),
            Ok(Statement::Org(Expr::Label("start".to_owned(), 0)))
        );
        assert_eq!(statement("END"), Ok(Statement::End(None)));
        assert_eq!(
            statement("end 3 ; done"),
            Ok(Statement::End(Some(Expr::Literal(3))))
        );
        assert_eq!(
            statement("ORG 1 2"),
            Err(ParseErrorKind::MalformedPseudoOp("2".to_owned()))
        );
    }

    #[test]
    fn rejects_bad_tokens() {
        assert_eq!(
            statement("XYZZY #1, #2"),
            Err(ParseErrorKind::UnknownOpcode("XYZZY".to_owned()))
        );
        assert_eq!(
            statement("MOV.Z $0, $1"),
            Err(ParseErrorKind::UnknownModifier("Z".to_owned()))
        );
        // Stepping must come after the modifier, not before
        assert_eq!(
            statement("MOV.S.I $0, $1"),
            Err(ParseErrorKind::UnknownModifier(".I".to_owned()))
        );
        assert_eq!(statement("MOV"), Err(ParseErrorKind::MissingOperand));
        assert_eq!(
            statement("MOV $1,"),
            Err(ParseErrorKind::MissingOperand)
        );
        // A bare label operand has no default mode
        assert_eq!(
            statement("JMP loop"),
            Err(ParseErrorKind::BadOperand("loop".to_owned()))
        );
        assert_eq!(
            statement("MOV $1, $2 extra"),
            Err(ParseErrorKind::BadOperand("extra".to_owned()))
        );
    }
}
