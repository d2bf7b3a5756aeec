//! Tokenizing MIPS operands.
//!
//! This module holds the tokens that make up an operand of a MIPS instruction ([`Token`]).
//! The parser lexes each comma-separated operand with it,
//! and [`literal`] uses it to classify numeric and symbolic literals.
//!
//! [`literal`]: super::literal

use std::num::IntErrorKind;

use logos::{Lexer, Logos};

use crate::ast::Reg;

/// A unit of information in a MIPS operand.
#[derive(Debug, Logos, PartialEq, Eq, Clone)]
#[logos(skip r"[ \t\r\n\f]+", error = LexErr)]
pub enum Token {
    /// A decimal integer (e.g., `4`, `-32768`, `+7`)
    #[regex(r"[+-]?[0-9]+", lex_dec, priority = 10)]
    Dec(i32),

    /// A hexadecimal integer (e.g., `0x400020`, `0XFF`, `-0x10`)
    #[regex(r"[+-]?0[xX][0-9A-Fa-f]+", lex_hex, priority = 10)]
    Hex(i32),

    /// A register (e.g., `$t0`, `$zero`, `$0`)
    #[regex(r"\$\w*", lex_reg)]
    Reg(Reg),

    /// Anything else which could be a label (e.g., `loop`, `end_if`, `12abc`).
    ///
    /// This excludes commas, parentheses, whitespace and `$`.
    #[regex(r"[^,()$ \t\r\n\f]+", |lx| lx.slice().to_string(), priority = 1)]
    Ident(String),

    /// An open parenthesis, which starts the base register of a memory operand
    #[token("(")]
    LParen,

    /// A close parenthesis, which ends the base register of a memory operand
    #[token(")")]
    RParen,

    /// A comma, which delineates operands of an instruction
    #[token(",")]
    Comma,
}

/// Any errors raised in attempting to tokenize an operand.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum LexErr {
    /// Numeric literal cannot fit within the range of an i32
    DoesNotFitI32,
    /// Token started with `$`, but does not name a register
    InvalidReg,
    /// A symbol was used which is not allowed in MIPS operands
    #[default]
    InvalidSymbol
}
impl std::fmt::Display for LexErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErr::DoesNotFitI32 => f.write_str("numeric token does not fit 32-bit signed integer"),
            LexErr::InvalidReg    => f.write_str("invalid register"),
            LexErr::InvalidSymbol => f.write_str("unrecognized symbol"),
        }
    }
}
impl std::error::Error for LexErr {}
impl crate::err::Error for LexErr {
    fn stage(&self) -> crate::err::Stage {
        crate::err::Stage::Parsing
    }

    fn help(&self) -> Option<std::borrow::Cow<'_, str>> {
        match self {
            LexErr::DoesNotFitI32 => Some(format!("the range for a 32-bit signed integer is [{}, {}]", i32::MIN, i32::MAX).into()),
            LexErr::InvalidReg    => Some("registers are named $zero, $at, $v0-$v1, $a0-$a3, $t0-$t9, $s0-$s8, $k0-$k1, $gp, $sp, $fp, $ra".into()),
            LexErr::InvalidSymbol => None,
        }
    }
}

fn convert_int_error(e: &IntErrorKind) -> LexErr {
    match e {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => LexErr::DoesNotFitI32,
        // regexes only let digits through
        _ => LexErr::InvalidSymbol,
    }
}
/// Splits the sign off of a numeric literal, returning whether it is negative.
fn split_sign(s: &str) -> (bool, &str) {
    match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    }
}
fn apply_sign(negative: bool, magnitude: i64) -> Result<i32, LexErr> {
    let value = if negative { -magnitude } else { magnitude };
    i32::try_from(value).map_err(|_| LexErr::DoesNotFitI32)
}
fn lex_dec(lx: &Lexer<'_, Token>) -> Result<i32, LexErr> {
    let (negative, digits) = split_sign(lx.slice());
    let magnitude = digits.parse::<i64>()
        .map_err(|e| convert_int_error(e.kind()))?;
    apply_sign(negative, magnitude)
}
fn lex_hex(lx: &Lexer<'_, Token>) -> Result<i32, LexErr> {
    let (negative, rest) = split_sign(lx.slice());
    let Some(hex) = rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) else {
        unreachable!("Lexer slice should have contained 0x or 0X");
    };
    let magnitude = i64::from_str_radix(hex, 16)
        .map_err(|e| convert_int_error(e.kind()))?;
    apply_sign(negative, magnitude)
}
fn lex_reg(lx: &Lexer<'_, Token>) -> Result<Reg, LexErr> {
    lx.slice().parse::<Reg>()
        .map_err(|_| LexErr::InvalidReg)
}

/// Reads a numeric literal that may not fit an i32, saturating at the bounds of an i64.
///
/// Returns `None` if `src` is not a decimal or hexadecimal literal.
pub(crate) fn saturating_value(src: &str) -> Option<i64> {
    let (negative, rest) = split_sign(src.trim());
    let (digits, radix) = match rest.strip_prefix("0x").or_else(|| rest.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (rest, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    let magnitude = match i64::from_str_radix(digits, radix) {
        Ok(m) => m,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
        Err(_) => return None,
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Lexes one operand into its tokens.
pub(crate) fn tokens(src: &str) -> Result<Vec<Token>, LexErr> {
    Token::lexer(src).collect()
}

#[cfg(test)]
mod tests {
    use logos::Logos;

    use crate::ast::Reg;
    use crate::err::LexErr;
    use crate::parse::lex::{saturating_value, Token};

    fn ident(s: &str) -> Token {
        Token::Ident(s.to_string())
    }

    #[test]
    fn test_numeric_dec_success() {
        let mut tokens = Token::lexer("0 123 -4 +7 2147483647 -2147483648");
        assert_eq!(tokens.next(), Some(Ok(Token::Dec(0))));
        assert_eq!(tokens.next(), Some(Ok(Token::Dec(123))));
        assert_eq!(tokens.next(), Some(Ok(Token::Dec(-4))));
        assert_eq!(tokens.next(), Some(Ok(Token::Dec(7))));
        assert_eq!(tokens.next(), Some(Ok(Token::Dec(i32::MAX))));
        assert_eq!(tokens.next(), Some(Ok(Token::Dec(i32::MIN))));
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn test_numeric_hex_success() {
        let mut tokens = Token::lexer("0x400020 0XFF 0xabcd 0x0 -0x10 0x7FFFFFFF");
        assert_eq!(tokens.next(), Some(Ok(Token::Hex(0x400020))));
        assert_eq!(tokens.next(), Some(Ok(Token::Hex(0xFF))));
        assert_eq!(tokens.next(), Some(Ok(Token::Hex(0xABCD))));
        assert_eq!(tokens.next(), Some(Ok(Token::Hex(0))));
        assert_eq!(tokens.next(), Some(Ok(Token::Hex(-0x10))));
        assert_eq!(tokens.next(), Some(Ok(Token::Hex(0x7FFF_FFFF))));
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn test_saturating_value() {
        assert_eq!(saturating_value("0xFFFFFFFC"), Some(0xFFFF_FFFC));
        assert_eq!(saturating_value("99999999999"), Some(99_999_999_999));
        assert_eq!(saturating_value("-0x80000001"), Some(-0x8000_0001));
        assert_eq!(saturating_value("+12"), Some(12));
        assert_eq!(saturating_value("999999999999999999999999999999"), Some(i64::MAX));
        assert_eq!(saturating_value("-999999999999999999999999999999"), Some(-i64::MAX));
        assert_eq!(saturating_value("0x"), None);
        assert_eq!(saturating_value("12abc"), None);
        assert_eq!(saturating_value("+-1"), None);
    }

    #[test]
    fn test_numeric_overflow() {
        assert_eq!(Token::lexer("2147483648").next(), Some(Err(LexErr::DoesNotFitI32)));
        assert_eq!(Token::lexer("-2147483649").next(), Some(Err(LexErr::DoesNotFitI32)));
        assert_eq!(Token::lexer("999999999999999999999999999999").next(), Some(Err(LexErr::DoesNotFitI32)));
        assert_eq!(Token::lexer("0xFFFFFFFF").next(), Some(Err(LexErr::DoesNotFitI32)));
        assert_eq!(Token::lexer("0x0123456789ABCDEF0123456789ABCDEF").next(), Some(Err(LexErr::DoesNotFitI32)));
    }

    #[test]
    fn test_malformed_numerics_are_idents() {
        assert_eq!(Token::lexer("12abc").next(), Some(Ok(ident("12abc"))));
        assert_eq!(Token::lexer("0x").next(), Some(Ok(ident("0x"))));
        assert_eq!(Token::lexer("0x1G").next(), Some(Ok(ident("0x1G"))));
        assert_eq!(Token::lexer("-").next(), Some(Ok(ident("-"))));
    }

    #[test]
    fn test_regs() {
        let mut tokens = Token::lexer("$zero $0 $t0 $sp $fp $s8 $ra");
        assert_eq!(tokens.next(), Some(Ok(Token::Reg(Reg(0)))));
        assert_eq!(tokens.next(), Some(Ok(Token::Reg(Reg(0)))));
        assert_eq!(tokens.next(), Some(Ok(Token::Reg(Reg(8)))));
        assert_eq!(tokens.next(), Some(Ok(Token::Reg(Reg(29)))));
        assert_eq!(tokens.next(), Some(Ok(Token::Reg(Reg(30)))));
        assert_eq!(tokens.next(), Some(Ok(Token::Reg(Reg(30)))));
        assert_eq!(tokens.next(), Some(Ok(Token::Reg(Reg(31)))));
        assert_eq!(tokens.next(), None);

        assert_eq!(Token::lexer("$t10").next(), Some(Err(LexErr::InvalidReg)));
        assert_eq!(Token::lexer("$").next(), Some(Err(LexErr::InvalidReg)));
        assert_eq!(Token::lexer("$foo").next(), Some(Err(LexErr::InvalidReg)));
    }

    #[test]
    fn test_idents() {
        let mut tokens = Token::lexer("loop END_IF _start l.1");
        assert_eq!(tokens.next(), Some(Ok(ident("loop"))));
        assert_eq!(tokens.next(), Some(Ok(ident("END_IF"))));
        assert_eq!(tokens.next(), Some(Ok(ident("_start"))));
        assert_eq!(tokens.next(), Some(Ok(ident("l.1"))));
        assert_eq!(tokens.next(), None);
    }

    #[test]
    fn test_punct() {
        let mut tokens = Token::lexer("-8($sp), 1");
        assert_eq!(tokens.next(), Some(Ok(Token::Dec(-8))));
        assert_eq!(tokens.next(), Some(Ok(Token::LParen)));
        assert_eq!(tokens.next(), Some(Ok(Token::Reg(Reg(29)))));
        assert_eq!(tokens.next(), Some(Ok(Token::RParen)));
        assert_eq!(tokens.next(), Some(Ok(Token::Comma)));
        assert_eq!(tokens.next(), Some(Ok(Token::Dec(1))));
        assert_eq!(tokens.next(), None);
    }
}
