//! Assembling parsed operands into a 32-bit MIPS word.
//!
//! This module converts [`ParsedOperands`] into the instruction's bit fields
//! according to its [`InstrDef`].
//!
//! The assembler module notably consists of:
//! - [`assemble`]: the main function, which produces the binary word and its [`Fields`]
//! - [`to_bits`]: the primitive which renders a number as a fixed-width bit string
//! - [`encoding`]: rendering of the assembled word (hexadecimal and text reports)

pub mod encoding;

use std::borrow::Cow;

use crate::ast::{Fields, ParsedOperands, Reg};
use crate::catalog::{Format, InstrDef};
use crate::err::Stage;
use crate::parse::lex::{saturating_value, LexErr};
use crate::parse::{literal, Literal};

/// Errors raised while encoding operands into bits.
#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum ConvertErr {
    /// A value does not fit in its bit field.
    OutOfRange {
        /// The value being encoded.
        value: i64,
        /// The smallest value the field accepts.
        min: i64,
        /// The largest value the field accepts.
        max: i64,
    },
    /// A register required by the instruction's format was not parsed.
    MissingRegister(&'static str),
    /// A shift instruction has no shift amount.
    MissingShamt,
    /// An R-type definition has no funct code.
    MissingFunct,
    /// An I-type or J-type instruction has no immediate, offset, or target.
    MissingImmediateOrLabel,
    /// A branch or jump target is a symbolic label, which cannot be resolved.
    UnresolvedSymbolicLabel(String),
    /// A jump target address is negative.
    NegativeAddress(i64),
    /// A jump target address is not a multiple of 4.
    MisalignedAddress(i64),
    /// The bit-string primitive produced a string of the wrong width (internal).
    InternalEncodingError {
        /// The width that was requested.
        width: u32,
        /// The length of the string that was produced.
        len: usize,
    },
    /// The assembled word is not 32 bits long (internal).
    AssemblyLengthError(usize),
    /// The hex renderer was given something other than 32 binary digits (internal).
    InvalidBinaryInput,
}
impl std::fmt::Display for ConvertErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { value, min, max } => write!(f, "value {value} is out of range [{min}, {max}]"),
            Self::MissingRegister(field) => write!(f, "missing register for field '{field}'"),
            Self::MissingShamt            => f.write_str("missing shift amount"),
            Self::MissingFunct            => f.write_str("R-type definition has no funct code"),
            Self::MissingImmediateOrLabel => f.write_str("missing immediate value or label"),
            Self::UnresolvedSymbolicLabel(label) => write!(f, "cannot resolve symbolic label '{label}'"),
            Self::NegativeAddress(addr)   => write!(f, "jump address {addr} is negative"),
            Self::MisalignedAddress(addr) => write!(f, "jump address {addr:#X} is not a multiple of 4"),
            Self::InternalEncodingError { width, len } => write!(f, "encoded field has {len} bits, expected {width}"),
            Self::AssemblyLengthError(len) => write!(f, "assembled instruction has {len} bits, expected 32"),
            Self::InvalidBinaryInput      => f.write_str("input to hex conversion is not a 32-bit binary string"),
        }
    }
}
impl std::error::Error for ConvertErr {}
impl crate::err::Error for ConvertErr {
    fn stage(&self) -> Stage {
        Stage::Conversion
    }

    fn help(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::OutOfRange { .. } => Some("use a smaller value, or split the constant across several instructions".into()),
            Self::UnresolvedSymbolicLabel(_) => Some("labels cannot be resolved for a single instruction; use a numeric offset or address".into()),
            Self::NegativeAddress(_)   => Some("jump targets are unsigned addresses".into()),
            Self::MisalignedAddress(_) => Some("instructions are word-aligned, so the address must be divisible by 4".into()),
            _ => None,
        }
    }

    fn is_internal(&self) -> bool {
        matches!(self,
            Self::InternalEncodingError { .. } | Self::AssemblyLengthError(_) | Self::InvalidBinaryInput
        )
    }
}

const REG_BITS: u32 = 5;
const SHAMT_BITS: u32 = 5;
const IMM_BITS: u32 = 16;
const ADDR_BITS: u32 = 26;
const WORD_BITS: usize = 32;

/// Renders a value as a bit string of exactly `width` bits.
///
/// Signed values use two's complement and must fit `[-2^(width-1), 2^(width-1) - 1]`;
/// unsigned values must fit `[0, 2^width - 1]`.
///
/// The width must be between 1 and 32 bits. Any other width is an internal error
/// ([`ConvertErr::InternalEncodingError`]).
///
/// # Examples
/// ```
/// use mips_interpret::asm::to_bits;
///
/// assert_eq!(to_bits(-4, 16, true).unwrap(), "1111111111111100");
/// assert_eq!(to_bits(17, 5, false).unwrap(), "10001");
/// assert!(to_bits(32, 5, false).is_err());
/// ```
pub fn to_bits(value: i64, width: u32, signed: bool) -> Result<String, ConvertErr> {
    if !(1..=32).contains(&width) {
        log::error!("cannot encode {value} into {width} bits");
        return Err(ConvertErr::InternalEncodingError { width, len: 0 });
    }
    let (min, max) = match signed {
        true  => (-(1i64 << (width - 1)), (1i64 << (width - 1)) - 1),
        false => (0, (1i64 << width) - 1),
    };
    if !(min..=max).contains(&value) {
        return Err(ConvertErr::OutOfRange { value, min, max });
    }

    let raw = match value < 0 {
        true  => (1i64 << width) + value,
        false => value,
    };
    let bits = format!("{raw:0w$b}", w = width as usize);

    match bits.len() == width as usize {
        true  => Ok(bits),
        false => {
            log::error!("encoding {value} into {width} bits produced {bits:?}");
            Err(ConvertErr::InternalEncodingError { width, len: bits.len() })
        },
    }
}

/// An assembled instruction.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Assembled {
    /// The 32-character binary string of the instruction.
    pub binary: String,
    /// The instruction's bit fields.
    pub fields: Fields,
}

fn reg_bits(m_reg: Option<Reg>, field: &'static str) -> Result<String, ConvertErr> {
    let reg = m_reg.ok_or(ConvertErr::MissingRegister(field))?;
    to_bits(i64::from(reg.reg_no()), REG_BITS, false)
}

/// Resolves a numeric target. Symbolic labels are always rejected.
///
/// Numbers too large for an i32 are still resolved, so that the field encoding reports them as out of range.
fn resolve_target(src: &str) -> Result<i64, ConvertErr> {
    match literal(src) {
        Ok(Literal::Dec(n) | Literal::Hex(n)) => Ok(i64::from(n)),
        Ok(Literal::Symbol(s)) => Err(ConvertErr::UnresolvedSymbolicLabel(s)),
        Err(LexErr::DoesNotFitI32) => saturating_value(src)
            .ok_or_else(|| ConvertErr::UnresolvedSymbolicLabel(src.to_string())),
        Err(_) => Err(ConvertErr::UnresolvedSymbolicLabel(src.to_string())),
    }
}

/// Assembles an instruction from its definition and parsed operands.
///
/// # Example
/// ```
/// use mips_interpret::asm::assemble;
/// use mips_interpret::catalog::lookup;
/// use mips_interpret::parse::parse_operands;
///
/// let def = lookup("add").unwrap();
/// let ops = parse_operands(Some("$t0, $s1, $s2"), def.template).unwrap();
/// let asm = assemble(def, &ops).unwrap();
/// assert_eq!(asm.binary, "00000010001100100100000000100000");
/// assert_eq!(asm.fields.rd.as_deref(), Some("01000"));
/// ```
pub fn assemble(def: &InstrDef, ops: &ParsedOperands) -> Result<Assembled, ConvertErr> {
    let mut fields = Fields { opcode: def.opcode.to_string(), ..Default::default() };

    match def.format {
        Format::R => {
            let rd = reg_bits(ops.rd, "rd")?;
            let (rs, rt, shamt) = match def.zeroes_rs {
                true => {
                    let shamt = ops.shamt.ok_or(ConvertErr::MissingShamt)?;
                    ("0".repeat(REG_BITS as usize), reg_bits(ops.rt, "rt")?, to_bits(i64::from(shamt), SHAMT_BITS, false)?)
                },
                false => (reg_bits(ops.rs, "rs")?, reg_bits(ops.rt, "rt")?, to_bits(0, SHAMT_BITS, false)?),
            };
            let funct = def.funct.ok_or(ConvertErr::MissingFunct)?;

            fields.rs = Some(rs);
            fields.rt = Some(rt);
            fields.rd = Some(rd);
            fields.shamt = Some(shamt);
            fields.funct = Some(funct.to_string());
        },
        Format::I => {
            let rs = reg_bits(ops.rs, "rs")?;
            let rt = reg_bits(ops.rt, "rt")?;

            let value = match def.branch {
                true => {
                    let label = ops.label.as_deref().ok_or(ConvertErr::MissingImmediateOrLabel)?;
                    resolve_target(label)?
                },
                false => ops.immediate
                    .map(i64::from)
                    .ok_or(ConvertErr::MissingImmediateOrLabel)?,
            };

            fields.rs = Some(rs);
            fields.rt = Some(rt);
            fields.immediate = Some(to_bits(value, IMM_BITS, true)?);
        },
        Format::J => {
            let addr = match (&ops.label, ops.immediate) {
                (Some(label), _) => resolve_target(label)?,
                (None, Some(imm)) => i64::from(imm),
                (None, None) => return Err(ConvertErr::MissingImmediateOrLabel),
            };
            if addr < 0 {
                return Err(ConvertErr::NegativeAddress(addr));
            }
            if addr % 4 != 0 {
                return Err(ConvertErr::MisalignedAddress(addr));
            }

            fields.address = Some(to_bits(addr / 4, ADDR_BITS, false)?);
        },
    }

    let binary = fields.concat();
    if binary.len() != WORD_BITS {
        log::error!("{} assembled into {} bits: {binary:?}", def.mnemonic, binary.len());
        return Err(ConvertErr::AssemblyLengthError(binary.len()));
    }

    Ok(Assembled { binary, fields })
}
