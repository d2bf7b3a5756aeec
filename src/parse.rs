//! Parsing MIPS assembly text into operands.
//!
//! This module covers the first stages of the pipeline:
//! - [`tokenize`]: splitting the raw instruction into a mnemonic and an operand string
//! - [`parse_operands`]: decoding the operand string according to an operand template
//! - [`literal`]: classifying numeric and symbolic literals, shared with the encoder

pub mod lex;

use std::borrow::Cow;

use self::lex::{LexErr, Token};
use crate::ast::{ParsedOperands, Reg};
use crate::catalog::{template_roles, Role};
use crate::err::Stage;

/// An instruction split into its mnemonic and its (unparsed) operands.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TokenizedInstr {
    /// The mnemonic, in lowercase.
    pub mnemonic: String,
    /// The raw, comma-separated operands, if any were given.
    pub operands: Option<String>,
}

/// Errors raised while tokenizing an instruction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum TokenizeErr {
    /// Nothing is left after removing comments and whitespace.
    EmptyInstruction,
}
impl std::fmt::Display for TokenizeErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenizeErr::EmptyInstruction => f.write_str("instruction is empty"),
        }
    }
}
impl std::error::Error for TokenizeErr {}
impl crate::err::Error for TokenizeErr {
    fn stage(&self) -> Stage {
        Stage::Tokenization
    }

    fn help(&self) -> Option<Cow<'_, str>> {
        match self {
            TokenizeErr::EmptyInstruction => Some("enter an instruction such as `add $t0, $s1, $s2`".into()),
        }
    }
}

/// Errors raised while looking up an instruction and parsing its operands.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum ParseErr {
    /// The mnemonic is not in the catalog.
    NotFound(String),
    /// The number of operands does not match the instruction's template.
    OperandCountMismatch {
        /// The operand template of the instruction.
        template: &'static str,
        /// The operands that were supplied.
        found: String,
    },
    /// An operand which should be a register is not one.
    InvalidRegister(String),
    /// An operand which should be a number is not one.
    InvalidImmediate(String),
    /// A shift amount is not within `[0, 31]`.
    ShamtOutOfRange(String),
    /// An operand which should have the form `offset(register)` does not.
    InvalidOffsetFormat(String),
    /// A branch or jump target is neither a number nor a label.
    InvalidLabel(String),
    /// The operand template contains an unknown role.
    UnknownFormatToken(String),
}
impl std::fmt::Display for ParseErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(m) => write!(f, "unknown mnemonic '{m}'"),
            Self::OperandCountMismatch { template, found } => write!(f, "expected operands '{template}', found '{found}'"),
            Self::InvalidRegister(s)     => write!(f, "invalid register '{s}'"),
            Self::InvalidImmediate(s)    => write!(f, "invalid immediate value '{s}'"),
            Self::ShamtOutOfRange(s)     => write!(f, "shift amount '{s}' is out of range"),
            Self::InvalidOffsetFormat(s) => write!(f, "invalid memory operand '{s}'"),
            Self::InvalidLabel(s)        => write!(f, "invalid label or address '{s}'"),
            Self::UnknownFormatToken(s)  => write!(f, "unknown operand format token '{s}'"),
        }
    }
}
impl std::error::Error for ParseErr {}
impl crate::err::Error for ParseErr {
    fn stage(&self) -> Stage {
        Stage::Parsing
    }

    fn help(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::NotFound(_) => {
                let supported: Vec<_> = crate::catalog::definitions().iter().map(|d| d.mnemonic).collect();
                Some(format!("supported instructions are: {}", supported.join(", ")).into())
            },
            Self::OperandCountMismatch { .. } => Some("operands are separated by commas".into()),
            Self::InvalidRegister(_)     => Some("registers start with '$' (e.g., $t0, $s1, $zero)".into()),
            Self::InvalidImmediate(_)    => Some("immediates are decimal (e.g., -4) or hexadecimal starting with 0x (e.g., 0x1F)".into()),
            Self::ShamtOutOfRange(_)     => Some("the shift amount is a decimal number in [0, 31]".into()),
            Self::InvalidOffsetFormat(_) => Some("memory operands look like offset(register), e.g., 8($sp)".into()),
            Self::InvalidLabel(_)        => Some("targets are decimal, hexadecimal starting with 0x, or a label name".into()),
            Self::UnknownFormatToken(_)  => None,
        }
    }
}

/// Splits a raw instruction into its mnemonic and operands.
///
/// Anything after a `#` is a comment and is discarded.
/// The mnemonic is lowercased; the operand string is kept as written (but trimmed).
///
/// # Example
/// ```
/// use mips_interpret::parse::tokenize;
///
/// let tok = tokenize("  ADD $t0, $s1, $s2  # sum").unwrap();
/// assert_eq!(tok.mnemonic, "add");
/// assert_eq!(tok.operands.as_deref(), Some("$t0, $s1, $s2"));
/// ```
pub fn tokenize(raw: &str) -> Result<TokenizedInstr, TokenizeErr> {
    let code = raw.split_once('#').map_or(raw, |(left, _)| left).trim();
    if code.is_empty() {
        return Err(TokenizeErr::EmptyInstruction);
    }

    let (mnemonic, operands) = match code.split_once(char::is_whitespace) {
        Some((m, rest)) => (m, Some(rest.trim())),
        None => (code, None),
    };

    Ok(TokenizedInstr {
        mnemonic: mnemonic.to_lowercase(),
        operands: operands.filter(|o| !o.is_empty()).map(str::to_string),
    })
}

/// A numeric or symbolic literal, as used for immediates, offsets and targets.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Literal {
    /// A decimal integer.
    Dec(i32),
    /// A hexadecimal integer (starting with `0x` or `0X`).
    Hex(i32),
    /// A symbolic label.
    Symbol(String),
}
impl Literal {
    /// The value of this literal, if it is numeric.
    pub fn value(&self) -> Option<i32> {
        match *self {
            Literal::Dec(n) | Literal::Hex(n) => Some(n),
            Literal::Symbol(_) => None,
        }
    }
}

/// Classifies a literal as decimal, hexadecimal, or symbolic.
///
/// This is the single source of truth for which numbers are accepted:
/// both the operand parser and the encoder go through it.
///
/// # Example
/// ```
/// use mips_interpret::parse::{literal, Literal};
///
/// assert_eq!(literal("-4"), Ok(Literal::Dec(-4)));
/// assert_eq!(literal("0x400020"), Ok(Literal::Hex(0x400020)));
/// assert_eq!(literal("loop"), Ok(Literal::Symbol("loop".to_string())));
/// assert!(literal("$t0").is_err());
/// ```
pub fn literal(src: &str) -> Result<Literal, LexErr> {
    match &*lex::tokens(src)? {
        [Token::Dec(n)] => Ok(Literal::Dec(*n)),
        [Token::Hex(n)] => Ok(Literal::Hex(*n)),
        [Token::Ident(s)] => Ok(Literal::Symbol(s.clone())),
        _ => Err(LexErr::InvalidSymbol),
    }
}

/// Splits operands on commas that are not inside parentheses, trimming each piece.
fn split_top_level(operands: &str) -> Vec<&str> {
    let mut pieces = vec![];
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in operands.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(operands[start..i].trim());
                start = i + 1;
            },
            _ => {}
        }
    }
    pieces.push(operands[start..].trim());
    pieces
}

/// Parses the operand string of an instruction against its operand template.
///
/// `operands` is the operand string from [`tokenize`] (`None` if there were no operands),
/// and `template` is the comma-separated operand template (e.g., `rt, offset(rs)`).
///
/// Only the roles in the template are filled in [`ParsedOperands`].
///
/// # Example
/// ```
/// use mips_interpret::parse::parse_operands;
///
/// let ops = parse_operands(Some("$t0, -8($sp)"), "rt, offset(rs)").unwrap();
/// assert_eq!(ops.rt.unwrap().reg_no(), 8);
/// assert_eq!(ops.rs.unwrap().reg_no(), 29);
/// assert_eq!(ops.immediate, Some(-8));
/// assert_eq!(ops.rd, None);
/// ```
pub fn parse_operands(operands: Option<&str>, template: &'static str) -> Result<ParsedOperands, ParseErr> {
    let pieces = operands.map_or_else(Vec::new, split_top_level);

    if pieces.len() != template.split(',').count() {
        return Err(ParseErr::OperandCountMismatch {
            template,
            found: operands.unwrap_or("").to_string(),
        });
    }

    let roles = template_roles(template)?;
    let mut parsed = ParsedOperands::default();
    for (role, piece) in roles.into_iter().zip(pieces) {
        log::trace!("parsing operand {piece:?} as {role}");

        match role {
            Role::Rd => parsed.rd = Some(parse_reg(piece)?),
            Role::Rs => parsed.rs = Some(parse_reg(piece)?),
            Role::Rt => parsed.rt = Some(parse_reg(piece)?),
            Role::Immediate => {
                let value = literal(piece).ok()
                    .and_then(|lit| lit.value())
                    .ok_or_else(|| ParseErr::InvalidImmediate(piece.to_string()))?;
                parsed.immediate = Some(value);
            },
            Role::Shamt => parsed.shamt = Some(parse_shamt(piece)?),
            Role::Label | Role::TargetAddress => {
                // numeric meaning (and range) is resolved at encoding
                if piece.is_empty() || piece.contains(|c: char| matches!(c, ',' | '(' | ')') || c.is_whitespace()) {
                    return Err(ParseErr::InvalidLabel(piece.to_string()));
                }
                parsed.label = Some(piece.to_string());
            },
            Role::OffsetRs => {
                let (offset, base) = parse_offset(piece)?;
                parsed.immediate = Some(offset);
                parsed.rs = Some(base);
            },
        }
    }

    Ok(parsed)
}

fn parse_reg(piece: &str) -> Result<Reg, ParseErr> {
    match lex::tokens(piece).as_deref() {
        Ok([Token::Reg(r)]) => Ok(*r),
        _ => Err(ParseErr::InvalidRegister(piece.to_string())),
    }
}
fn parse_shamt(piece: &str) -> Result<u8, ParseErr> {
    match literal(piece) {
        Ok(Literal::Dec(n)) => u8::try_from(n).ok()
            .filter(|&n| n < 32)
            .ok_or_else(|| ParseErr::ShamtOutOfRange(piece.to_string())),
        Err(LexErr::DoesNotFitI32) => Err(ParseErr::ShamtOutOfRange(piece.to_string())),
        _ => Err(ParseErr::InvalidImmediate(piece.to_string())),
    }
}
fn parse_offset(piece: &str) -> Result<(i32, Reg), ParseErr> {
    match lex::tokens(piece).as_deref() {
        Ok([Token::Dec(n) | Token::Hex(n), Token::LParen, Token::Reg(r), Token::RParen]) => Ok((*n, *r)),
        _ => Err(ParseErr::InvalidOffsetFormat(piece.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ParsedOperands, Reg};
    use crate::err::LexErr;

    use super::{literal, parse_operands, split_top_level, tokenize, Literal, ParseErr, TokenizeErr, TokenizedInstr};

    fn reg(s: &str) -> Reg {
        s.parse().unwrap()
    }
    fn assert_parse_fail(r: Result<ParsedOperands, ParseErr>, kind: ParseErr) {
        assert_eq!(r.unwrap_err(), kind);
    }

    #[test]
    fn test_tokenize_basic() {
        assert_eq!(tokenize("add $t0, $s1, $s2"), Ok(TokenizedInstr {
            mnemonic: "add".to_string(),
            operands: Some("$t0, $s1, $s2".to_string()),
        }));
        assert_eq!(tokenize("\tADDI   $t0,$s0,-4  "), Ok(TokenizedInstr {
            mnemonic: "addi".to_string(),
            operands: Some("$t0,$s0,-4".to_string()),
        }));
        assert_eq!(tokenize("syscall"), Ok(TokenizedInstr {
            mnemonic: "syscall".to_string(),
            operands: None,
        }));
    }

    #[test]
    fn test_tokenize_comments() {
        assert_eq!(tokenize("j 0x400020 # jump to main").unwrap().operands.as_deref(), Some("0x400020"));
        assert_eq!(tokenize("nop#"), Ok(TokenizedInstr { mnemonic: "nop".to_string(), operands: None }));
        assert_eq!(tokenize("  add   # $t0"), Ok(TokenizedInstr { mnemonic: "add".to_string(), operands: None }));
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(tokenize(""), Err(TokenizeErr::EmptyInstruction));
        assert_eq!(tokenize("   \t "), Err(TokenizeErr::EmptyInstruction));
        assert_eq!(tokenize("# just a comment"), Err(TokenizeErr::EmptyInstruction));
        assert_eq!(tokenize("   # indented comment"), Err(TokenizeErr::EmptyInstruction));
    }

    #[test]
    fn test_literal() {
        assert_eq!(literal("12"), Ok(Literal::Dec(12)));
        assert_eq!(literal(" -12 "), Ok(Literal::Dec(-12)));
        assert_eq!(literal("0X1f"), Ok(Literal::Hex(0x1F)));
        assert_eq!(literal("main"), Ok(Literal::Symbol("main".to_string())));
        assert_eq!(literal("99999999999"), Err(LexErr::DoesNotFitI32));
        assert_eq!(literal(""), Err(LexErr::InvalidSymbol));
        assert_eq!(literal("a b"), Err(LexErr::InvalidSymbol));
        assert_eq!(literal("(a)"), Err(LexErr::InvalidSymbol));

        assert_eq!(Literal::Hex(4).value(), Some(4));
        assert_eq!(Literal::Symbol("x".to_string()).value(), None);
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(split_top_level("$t0, $s1 ,$s2"), ["$t0", "$s1", "$s2"]);
        assert_eq!(split_top_level("$t0, 4($sp)"), ["$t0", "4($sp)"]);
        assert_eq!(split_top_level("$t0, 4($sp, $t1)"), ["$t0", "4($sp, $t1)"]);
        assert_eq!(split_top_level("$t0,,$t1"), ["$t0", "", "$t1"]);
    }

    #[test]
    fn test_parse_r() {
        let ops = parse_operands(Some("$t0, $s1, $s2"), "rd, rs, rt").unwrap();
        assert_eq!(ops, ParsedOperands {
            rd: Some(reg("$t0")),
            rs: Some(reg("$s1")),
            rt: Some(reg("$s2")),
            ..Default::default()
        });

        let ops = parse_operands(Some("$t0, $t1, 4"), "rd, rt, shamt").unwrap();
        assert_eq!(ops, ParsedOperands {
            rd: Some(reg("$t0")),
            rt: Some(reg("$t1")),
            shamt: Some(4),
            ..Default::default()
        });
    }

    #[test]
    fn test_parse_i() {
        let ops = parse_operands(Some("$t0, $s0, -4"), "rt, rs, immediate").unwrap();
        assert_eq!(ops.immediate, Some(-4));
        assert_eq!(ops.rs, Some(reg("$s0")));
        assert_eq!(ops.rt, Some(reg("$t0")));

        let ops = parse_operands(Some("$t0, $s0, 0x7fff"), "rt, rs, immediate").unwrap();
        assert_eq!(ops.immediate, Some(0x7FFF));

        // range is not checked here
        let ops = parse_operands(Some("$t0, $s0, 100000"), "rt, rs, immediate").unwrap();
        assert_eq!(ops.immediate, Some(100000));

        let ops = parse_operands(Some("$t0, 0x10($gp)"), "rt, offset(rs)").unwrap();
        assert_eq!(ops.immediate, Some(16));
        assert_eq!(ops.rs, Some(reg("$gp")));

        let ops = parse_operands(Some("$t0, $t1, loop"), "rs, rt, label").unwrap();
        assert_eq!(ops.label.as_deref(), Some("loop"));
        assert_eq!(ops.immediate, None);
    }

    #[test]
    fn test_parse_j() {
        let ops = parse_operands(Some("0x400020"), "target_address").unwrap();
        assert_eq!(ops.label.as_deref(), Some("0x400020"));
        assert_eq!(ops, ParsedOperands { label: Some("0x400020".to_string()), ..Default::default() });
    }

    #[test]
    fn test_operand_count() {
        assert_parse_fail(
            parse_operands(Some("$t0, $s1"), "rd, rs, rt"),
            ParseErr::OperandCountMismatch { template: "rd, rs, rt", found: "$t0, $s1".to_string() }
        );
        assert_parse_fail(
            parse_operands(None, "target_address"),
            ParseErr::OperandCountMismatch { template: "target_address", found: String::new() }
        );
        assert_parse_fail(
            parse_operands(Some("$t0, $t1, $t2, $t3"), "rd, rs, rt"),
            ParseErr::OperandCountMismatch { template: "rd, rs, rt", found: "$t0, $t1, $t2, $t3".to_string() }
        );
    }

    #[test]
    fn test_invalid_register() {
        assert_parse_fail(parse_operands(Some("t0, $s1, $s2"), "rd, rs, rt"), ParseErr::InvalidRegister("t0".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, $s9, $s2"), "rd, rs, rt"), ParseErr::InvalidRegister("$s9".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, $s1, 4"), "rd, rs, rt"), ParseErr::InvalidRegister("4".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, , $s2"), "rd, rs, rt"), ParseErr::InvalidRegister(String::new()));
    }

    #[test]
    fn test_invalid_immediate() {
        assert_parse_fail(parse_operands(Some("$t0, $s0, abc"), "rt, rs, immediate"), ParseErr::InvalidImmediate("abc".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, $s0, 12abc"), "rt, rs, immediate"), ParseErr::InvalidImmediate("12abc".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, $s0, $t1"), "rt, rs, immediate"), ParseErr::InvalidImmediate("$t1".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, $s0, 0x"), "rt, rs, immediate"), ParseErr::InvalidImmediate("0x".to_string()));
    }

    #[test]
    fn test_shamt_range() {
        assert_eq!(parse_operands(Some("$t0, $t1, 0"), "rd, rt, shamt").unwrap().shamt, Some(0));
        assert_eq!(parse_operands(Some("$t0, $t1, 31"), "rd, rt, shamt").unwrap().shamt, Some(31));

        assert_parse_fail(parse_operands(Some("$t0, $t1, 32"), "rd, rt, shamt"), ParseErr::ShamtOutOfRange("32".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, $t1, -1"), "rd, rt, shamt"), ParseErr::ShamtOutOfRange("-1".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, $t1, 99999999999"), "rd, rt, shamt"), ParseErr::ShamtOutOfRange("99999999999".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, $t1, 0x1"), "rd, rt, shamt"), ParseErr::InvalidImmediate("0x1".to_string()));
    }

    #[test]
    fn test_offset_format() {
        assert_parse_fail(parse_operands(Some("$t0, $sp"), "rt, offset(rs)"), ParseErr::InvalidOffsetFormat("$sp".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, ($sp)"), "rt, offset(rs)"), ParseErr::InvalidOffsetFormat("($sp)".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, 4($foo)"), "rt, offset(rs)"), ParseErr::InvalidOffsetFormat("4($foo)".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, 4($sp"), "rt, offset(rs)"), ParseErr::InvalidOffsetFormat("4($sp".to_string()));
        assert_parse_fail(parse_operands(Some("$t0, x($sp)"), "rt, offset(rs)"), ParseErr::InvalidOffsetFormat("x($sp)".to_string()));
    }

    #[test]
    fn test_invalid_label() {
        assert_parse_fail(parse_operands(Some(""), "target_address"), ParseErr::InvalidLabel(String::new()));
        assert_parse_fail(parse_operands(Some("$t0, $t1, "), "rs, rt, label"), ParseErr::InvalidLabel(String::new()));
        assert_parse_fail(parse_operands(Some("(main)"), "target_address"), ParseErr::InvalidLabel("(main)".to_string()));
        assert_parse_fail(parse_operands(Some("a b"), "target_address"), ParseErr::InvalidLabel("a b".to_string()));
    }

    #[test]
    fn test_label_text_kept() {
        // anything without commas, parentheses or whitespace is a label
        for target in ["$ra", "a$b", "0xFFFFFFFC", "99999999999", "12abc", "end_if", "-4"] {
            let ops = parse_operands(Some(target), "target_address").unwrap();
            assert_eq!(ops.label.as_deref(), Some(target));
        }
        let ops = parse_operands(Some("$t0, $t1, a$b"), "rs, rt, label").unwrap();
        assert_eq!(ops.label.as_deref(), Some("a$b"));
    }

    #[test]
    fn test_unknown_format_token() {
        assert_parse_fail(parse_operands(Some("$t0, $t1"), "rd, base"), ParseErr::UnknownFormatToken("base".to_string()));
        // operand count is checked first
        assert_parse_fail(
            parse_operands(Some("$t0"), "rd, base"),
            ParseErr::OperandCountMismatch { template: "rd, base", found: "$t0".to_string() }
        );
    }
}
