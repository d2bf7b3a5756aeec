//! A single-instruction MIPS assembler that explains its encoding.
//!
//! Given one line of MIPS assembly, this crate produces its 32-bit machine word
//! (in binary and hexadecimal), a breakdown of the word's bit fields,
//! and a description of what the instruction does.
//!
//! # Usage
//!
//! Everything goes through [`interpret`]:
//! ```
//! use mips_interpret::interpret;
//! use mips_interpret::catalog::Format;
//!
//! let result = interpret("add $t0, $s1, $s2").unwrap();
//! assert_eq!(result.mnemonic, "add");
//! assert_eq!(result.format, Format::R);
//! assert_eq!(result.binary, "00000010001100100100000000100000");
//! assert_eq!(result.hex, "0x02324020");
//! assert_eq!(result.fields.funct.as_deref(), Some("100000"));
//! ```
//!
//! Errors are tagged with the stage of the pipeline that rejected the input:
//! ```
//! use mips_interpret::interpret;
//! use mips_interpret::err::{Error, Stage};
//!
//! let err = interpret("lw $t0, $sp").unwrap_err();
//! assert_eq!(err.stage(), Stage::Parsing);
//!
//! let err = interpret("j 0x400021").unwrap_err();
//! assert_eq!(err.stage(), Stage::Conversion);
//! ```
//!
//! The individual stages are also exposed:
//! - [`parse`]: tokenizing the instruction and parsing its operands
//! - [`catalog`]: the table of supported instructions
//! - [`asm`]: encoding operands into bits and rendering hexadecimal
//!
//! To interpret many instructions in parallel, see [`batch`].
#![warn(missing_docs)]

pub mod parse;
pub mod ast;
pub mod catalog;
pub mod asm;
pub mod batch;
pub mod err;

use ast::{Fields, ParsedOperands};
use catalog::Format;
use err::MipsErr;
use parse::TokenizedInstr;

/// The result of interpreting an instruction.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Interpretation {
    /// The instruction as given.
    pub raw: String,
    /// The instruction split into mnemonic and operands.
    pub tokenized: TokenizedInstr,
    /// The mnemonic, as found in the catalog.
    pub mnemonic: &'static str,
    /// The encoding format.
    pub format: Format,
    /// What the instruction does.
    pub description: &'static str,
    /// The parsed operands.
    pub operands: ParsedOperands,
    /// The bit fields of the encoded instruction.
    pub fields: Fields,
    /// The 32-character binary string of the encoded instruction.
    pub binary: String,
    /// The encoded instruction in hexadecimal (e.g., `0x02324020`).
    pub hex: String,
}
impl Interpretation {
    /// The encoded instruction as a 32-bit word.
    pub fn word(&self) -> u32 {
        u32::from_str_radix(&self.binary, 2)
            .unwrap_or_else(|_| unreachable!("binary should have been validated as 32 bits"))
    }
}
impl std::fmt::Display for Interpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        asm::encoding::write_report(f, self)
    }
}

/// Interprets one line of MIPS assembly.
///
/// The line is tokenized, its mnemonic is looked up in the [`catalog`],
/// its operands are parsed and encoded, and the resulting word is rendered in hexadecimal.
/// The first stage to fail ends the process, and its error is returned.
pub fn interpret(instruction: &str) -> Result<Interpretation, MipsErr> {
    let result = interpret_inner(instruction);
    match &result {
        Ok(interp) => log::debug!("{instruction:?} => {}", interp.hex),
        Err(e) if err::Error::is_internal(e) => log::error!("internal error interpreting {instruction:?}: {e}"),
        Err(e) => log::debug!("{instruction:?} rejected at {} stage: {e}", err::Error::stage(e)),
    }
    result
}

fn interpret_inner(instruction: &str) -> Result<Interpretation, MipsErr> {
    let tokenized = parse::tokenize(instruction)?;
    log::debug!("tokenized {instruction:?} into {tokenized:?}");

    let def = catalog::lookup(&tokenized.mnemonic)?;
    let operands = parse::parse_operands(tokenized.operands.as_deref(), def.template)?;
    log::debug!("parsed operands {operands:?}");

    let asm::Assembled { binary, fields } = asm::assemble(def, &operands)?;
    let hex = asm::encoding::binary_to_hex(&binary)?;

    Ok(Interpretation {
        raw: instruction.to_string(),
        tokenized,
        mnemonic: def.mnemonic,
        format: def.format,
        description: def.description,
        operands,
        fields,
        binary,
        hex,
    })
}
