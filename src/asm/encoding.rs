//! Formatters for an assembled instruction.
//!
//! This module provides:
//! - [`binary_to_hex`]: renders a 32-bit binary string as a `0x`-prefixed hexadecimal word
//! - [`write_report`]: writes a text report of an [`Interpretation`], including its field table

use std::fmt::Write;

use super::ConvertErr;
use crate::Interpretation;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";
const TABLE_DIV: &str = " | ";

/// Renders a 32-character binary string as an uppercase hexadecimal word (e.g., `0x02324020`).
///
/// The input must be exactly 32 characters of `0` and `1`,
/// otherwise this fails with [`ConvertErr::InvalidBinaryInput`].
///
/// # Example
/// ```
/// use mips_interpret::asm::encoding::binary_to_hex;
///
/// let hex = binary_to_hex("00000010001100100100000000100000").unwrap();
/// assert_eq!(hex, "0x02324020");
///
/// assert!(binary_to_hex("0101").is_err());
/// ```
pub fn binary_to_hex(binary: &str) -> Result<String, ConvertErr> {
    let bytes = binary.as_bytes();
    if bytes.len() != 32 || !bytes.iter().all(|b| matches!(b, b'0' | b'1')) {
        log::error!("hex conversion given {binary:?}");
        return Err(ConvertErr::InvalidBinaryInput);
    }

    let mut hex = String::with_capacity(10);
    hex.push_str("0x");
    for nibble in bytes.chunks_exact(4) {
        let value = nibble.iter().fold(0usize, |acc, &b| (acc << 1) | usize::from(b - b'0'));
        hex.push(char::from(HEX_DIGITS[value]));
    }

    Ok(hex)
}

/// Writes a text report of an interpretation.
///
/// The report looks like:
/// ```text
/// add $t0, $s1, $s2
/// MNEMONIC | add (R-type)
/// ...
/// FIELD  | BINARY | BITS
/// opcode | 000000 |    6
/// ...
/// ```
pub fn write_report(buf: &mut impl Write, interp: &Interpretation) -> std::fmt::Result {
    writeln!(buf, "{}", interp.raw.trim())?;
    writeln!(buf, "MNEMONIC{TABLE_DIV}{} ({}-type)", interp.mnemonic, interp.format)?;
    writeln!(buf, "BINARY  {TABLE_DIV}{}", interp.fields.grouped())?;
    writeln!(buf, "HEX     {TABLE_DIV}{}", interp.hex)?;
    writeln!(buf, "{}", interp.description)?;
    writeln!(buf)?;

    const FIELD: &str = "FIELD";
    const BINARY: &str = "BINARY";
    const BITS: &str = "BITS";

    let (field_col, bin_col) = interp.fields.iter()
        .fold(
            (FIELD.len(), BINARY.len()),
            |(fc, bc), (name, bits)| (fc.max(name.len()), bc.max(bits.len()))
        );

    writeln!(buf, "{FIELD:1$}{0}{BINARY:2$}{0}{BITS}", TABLE_DIV, field_col, bin_col)?;
    for (name, bits) in interp.fields.iter() {
        writeln!(buf, "{name:1$}{0}{bits:2$}{0}{3:4$}", TABLE_DIV, field_col, bin_col, bits.len(), BITS.len())?;
    }

    Ok(())
}
