use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_while},
    character::complete::{i64, satisfy, space0},
    combinator::{all_consuming, map, recognize},
    error::VerboseError,
    sequence::{delimited, pair},
    IResult,
};
use redcode::{
    AddrMode, AddrMode::*, Modifier, Modifier::*, Opcode, Opcode::*, Stepping,
};

/// Parser result over string input with verbose errors
pub type PResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Consumes a signed decimal literal, allowing a redundant leading `+`
pub fn number(input: &str) -> PResult<i64> {
    delimited(space0, only_number, space0)(input)
}

/// A signed decimal literal without surrounding whitespace
fn only_number(input: &str) -> PResult<i64> {
    if let Some(stripped_input) = input.strip_prefix('+') {
        // A "+" prefix may not be followed by another sign
        if stripped_input.starts_with(['+', '-']) {
            return i64("");
        }
        i64(stripped_input)
    } else {
        i64(input)
    }
}

/// Consumes an identifier: a letter or underscore followed by any run of
/// letters, digits, and underscores
pub fn identifier(input: &str) -> PResult<&str> {
    recognize(pair(
        satisfy(|c| c.is_ascii_alphabetic() || c == '_'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

/// Consumes exactly one opcode mnemonic and returns the enum
pub fn opcode(input: &str) -> PResult<Opcode> {
    alt((
        map(tag_no_case("DAT"), |_| Dat),
        map(tag_no_case("MOV"), |_| Mov),
        map(tag_no_case("ADD"), |_| Add),
        map(tag_no_case("SUB"), |_| Sub),
        map(tag_no_case("MUL"), |_| Mul),
        map(tag_no_case("DIV"), |_| Div),
        map(tag_no_case("MOD"), |_| Mod),
        map(tag_no_case("JMP"), |_| Jmp),
        map(tag_no_case("JMZ"), |_| Jmz),
        map(tag_no_case("JMN"), |_| Jmn),
        map(tag_no_case("DJN"), |_| Djn),
        map(tag_no_case("SPL"), |_| Spl),
        map(tag_no_case("SLT"), |_| Slt),
        map(tag_no_case("CMP"), |_| Cmp),
        map(tag_no_case("SEQ"), |_| Seq),
        map(tag_no_case("SNE"), |_| Sne),
        map(tag_no_case("NOP"), |_| Nop),
    ))(input)
}

/// Consumes exactly one modifier mnemonic
pub fn modifier(input: &str) -> PResult<Modifier> {
    alt((
        map(tag_no_case("AB"), |_| AB),
        map(tag_no_case("BA"), |_| BA),
        map(tag_no_case("A"), |_| A),
        map(tag_no_case("B"), |_| B),
        map(tag_no_case("X"), |_| X),
        map(tag_no_case("F"), |_| F),
        map(tag_no_case("I"), |_| I),
    ))(input)
}

/// Consumes exactly one stepping mnemonic.
///
/// Stepping and modifier mnemonics are disjoint, so a lone suffix such as
/// `.S` is never ambiguous.
pub fn stepping(input: &str) -> PResult<Stepping> {
    alt((
        map(tag_no_case("D"), |_| Stepping::D),
        map(tag_no_case("S"), |_| Stepping::S),
        map(tag_no_case("Q"), |_| Stepping::Q),
        map(tag_no_case("W"), |_| Stepping::W),
    ))(input)
}

/// Consumes one addressing mode sigil
pub fn addr_mode(input: &str) -> PResult<AddrMode> {
    alt((
        map(tag("#"), |_| Immediate),
        map(tag("$"), |_| Direct),
        map(tag("@"), |_| IndirectB),
        map(tag("<"), |_| PredecB),
        map(tag(">"), |_| PostincB),
    ))(input)
}

/// Runs a primitive against a complete token, rejecting partial matches
pub fn exact<'a, T>(
    parser: impl FnMut(&'a str) -> PResult<'a, T>,
    token: &'a str,
) -> Option<T> {
    all_consuming(parser)(token).ok().map(|(_, value)| value)
}
