//! The table of supported MIPS instructions.
//!
//! Each supported mnemonic has exactly one [`InstrDef`],
//! which describes its format, its opcode (and funct code, for R-type instructions),
//! and the template its operands must follow.
//!
//! The table is fixed at compile time and can be queried with [`lookup`]
//! or iterated with [`definitions`].

use crate::parse::ParseErr;

/// The encoding format of an instruction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Format {
    /// Register format: `opcode rs rt rd shamt funct`.
    R,
    /// Immediate format: `opcode rs rt immediate`.
    I,
    /// Jump format: `opcode address`.
    J,
}
impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::R => f.write_str("R"),
            Format::I => f.write_str("I"),
            Format::J => f.write_str("J"),
        }
    }
}

/// An operand role, as it appears in an operand template.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Role {
    /// `rd`: destination register
    Rd,
    /// `rs`: source register
    Rs,
    /// `rt`: target register
    Rt,
    /// `immediate`: 16-bit immediate value
    Immediate,
    /// `shamt`: 5-bit shift amount
    Shamt,
    /// `label`: branch offset
    Label,
    /// `target_address`: jump target
    TargetAddress,
    /// `offset(rs)`: memory offset from a base register
    OffsetRs,
}
impl std::str::FromStr for Role {
    type Err = ParseErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rd"             => Ok(Role::Rd),
            "rs"             => Ok(Role::Rs),
            "rt"             => Ok(Role::Rt),
            "immediate"      => Ok(Role::Immediate),
            "shamt"          => Ok(Role::Shamt),
            "label"          => Ok(Role::Label),
            "target_address" => Ok(Role::TargetAddress),
            "offset(rs)"     => Ok(Role::OffsetRs),
            _ => Err(ParseErr::UnknownFormatToken(s.to_string())),
        }
    }
}
impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Rd            => f.write_str("rd"),
            Role::Rs            => f.write_str("rs"),
            Role::Rt            => f.write_str("rt"),
            Role::Immediate     => f.write_str("immediate"),
            Role::Shamt         => f.write_str("shamt"),
            Role::Label         => f.write_str("label"),
            Role::TargetAddress => f.write_str("target_address"),
            Role::OffsetRs      => f.write_str("offset(rs)"),
        }
    }
}

/// The definition of a supported instruction.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct InstrDef {
    /// The lowercase mnemonic (e.g., `add`).
    pub mnemonic: &'static str,
    /// The encoding format.
    pub format: Format,
    /// The 6-bit opcode, as a binary string.
    pub opcode: &'static str,
    /// The 6-bit function code, as a binary string. Present only for R-type instructions.
    pub funct: Option<&'static str>,
    /// The operand template, a comma-separated list of roles (e.g., `rt, offset(rs)`).
    pub template: &'static str,
    /// A human-readable explanation of what the instruction does.
    pub description: &'static str,
    /// Whether the machine `rs` field of this instruction is always zero.
    ///
    /// This holds for the shift family (`sll`, `srl`, `sra`),
    /// which take their shift amount from `shamt` and their operand from `rt`.
    pub zeroes_rs: bool,
    /// Whether this instruction is a conditional branch,
    /// whose 16-bit field is taken from its label operand.
    pub branch: bool,
}

/// Splits an operand template into its roles, in order.
///
/// This fails with [`ParseErr::UnknownFormatToken`] if the template has an unknown role.
///
/// # Example
/// ```
/// use mips_interpret::catalog::{template_roles, Role};
///
/// assert_eq!(template_roles("rt, offset(rs)"), Ok(vec![Role::Rt, Role::OffsetRs]));
/// assert!(template_roles("rd, base").is_err());
/// ```
pub fn template_roles(template: &str) -> Result<Vec<Role>, ParseErr> {
    template.split(',')
        .map(|tok| tok.trim().parse())
        .collect()
}

const R_OPCODE: &str = "000000";

macro_rules! catalog {
    ($($mnemonic:literal: $format:ident, $opcode:expr, $funct:expr, $template:literal, $desc:literal $(, $flag:ident)*;)+) => {
        const CATALOG: &[InstrDef] = &[
            $(
                {
                    #[allow(unused_mut)]
                    let mut def = InstrDef {
                        mnemonic: $mnemonic,
                        format: Format::$format,
                        opcode: $opcode,
                        funct: $funct,
                        template: $template,
                        description: $desc,
                        zeroes_rs: false,
                        branch: false,
                    };
                    $(def.$flag = true;)*
                    def
                }
            ),+
        ];
    };
}
catalog! {
    "add":  R, R_OPCODE, Some("100000"), "rd, rs, rt",
        "Adds the signed contents of 'rs' and 'rt' and stores the result in 'rd'. Traps on overflow.";
    "sub":  R, R_OPCODE, Some("100010"), "rd, rs, rt",
        "Subtracts the signed contents of 'rt' from 'rs' and stores the result in 'rd'. Traps on overflow.";
    "and":  R, R_OPCODE, Some("100100"), "rd, rs, rt",
        "Computes the bitwise AND of 'rs' and 'rt' and stores the result in 'rd'.";
    "or":   R, R_OPCODE, Some("100101"), "rd, rs, rt",
        "Computes the bitwise OR of 'rs' and 'rt' and stores the result in 'rd'.";
    "nor":  R, R_OPCODE, Some("100111"), "rd, rs, rt",
        "Computes the bitwise NOR of 'rs' and 'rt' and stores the result in 'rd'.";
    "slt":  R, R_OPCODE, Some("101010"), "rd, rs, rt",
        "Sets 'rd' to 1 if 'rs' is less than 'rt' (signed), and to 0 otherwise.";
    "sll":  R, R_OPCODE, Some("000000"), "rd, rt, shamt",
        "Shifts 'rt' left by 'shamt' bits, filling with zeros, and stores the result in 'rd'. The machine 'rs' field is zero.", zeroes_rs;
    "srl":  R, R_OPCODE, Some("000010"), "rd, rt, shamt",
        "Shifts 'rt' right by 'shamt' bits, filling with zeros, and stores the result in 'rd'. The machine 'rs' field is zero.", zeroes_rs;
    "sra":  R, R_OPCODE, Some("000011"), "rd, rt, shamt",
        "Shifts 'rt' right by 'shamt' bits, filling with the sign bit, and stores the result in 'rd'. The machine 'rs' field is zero.", zeroes_rs;

    "addi": I, "001000", None, "rt, rs, immediate",
        "Adds 'rs' and the sign-extended 16-bit immediate and stores the result in 'rt'. Traps on overflow.";
    "slti": I, "001010", None, "rt, rs, immediate",
        "Sets 'rt' to 1 if 'rs' is less than the sign-extended 16-bit immediate (signed), and to 0 otherwise.";
    "lw":   I, "100011", None, "rt, offset(rs)",
        "Loads a word from memory into 'rt'. Address = 'rs' + sign-extended 16-bit offset.";
    "sw":   I, "101011", None, "rt, offset(rs)",
        "Stores the word in 'rt' into memory. Address = 'rs' + sign-extended 16-bit offset.";
    "beq":  I, "000100", None, "rs, rt, label",
        "If 'rs' == 'rt', branches to PC + 4 + (offset << 2). The offset is signed.", branch;
    "bne":  I, "000101", None, "rs, rt, label",
        "If 'rs' != 'rt', branches to PC + 4 + (offset << 2). The offset is signed.", branch;

    "j":    J, "000010", None, "target_address",
        "Jumps unconditionally to 'target_address'. The upper 4 bits of the new PC are taken from the current PC.";
    "jal":  J, "000011", None, "target_address",
        "Stores the return address in $ra and jumps to 'target_address'. The upper 4 bits of the new PC are taken from the current PC.";
}

/// Looks up the definition of a mnemonic.
///
/// The mnemonic must already be lowercase.
/// If no instruction has this mnemonic, this fails with [`ParseErr::NotFound`].
///
/// # Example
/// ```
/// use mips_interpret::catalog::{lookup, Format};
///
/// let def = lookup("add").unwrap();
/// assert_eq!(def.format, Format::R);
/// assert_eq!(def.funct, Some("100000"));
///
/// assert!(lookup("foo").is_err());
/// ```
pub fn lookup(mnemonic: &str) -> Result<&'static InstrDef, ParseErr> {
    CATALOG.iter()
        .find(|def| def.mnemonic == mnemonic)
        .ok_or_else(|| ParseErr::NotFound(mnemonic.to_string()))
}

/// All supported instruction definitions.
pub fn definitions() -> &'static [InstrDef] {
    CATALOG
}
